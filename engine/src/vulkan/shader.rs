use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::*;
use vulkanalia::bytecode::Bytecode;
use vulkanalia::vk;

use crate::error::ShaderLoadError;

const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Compiled SPIR-V read from disk, kept as aligned words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderBytecode {
    pub path: PathBuf,
    pub words: Vec<u32>,
}

/// The stage bytecode the pipeline is rebuilt from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderSet {
    pub vertex: ShaderBytecode,
    pub fragment: ShaderBytecode,
}

impl ShaderSet {
    pub fn load(
        vertex: impl AsRef<Path>,
        fragment: impl AsRef<Path>,
    ) -> Result<Self, ShaderLoadError> {
        Ok(Self {
            vertex: load_shader(vertex)?,
            fragment: load_shader(fragment)?,
        })
    }

    pub fn stages(&self) -> [(vk::ShaderStageFlags, &ShaderBytecode); 2] {
        [
            (vk::ShaderStageFlags::VERTEX, &self.vertex),
            (vk::ShaderStageFlags::FRAGMENT, &self.fragment),
        ]
    }
}

pub fn load_shader(path: impl AsRef<Path>) -> Result<ShaderBytecode, ShaderLoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ShaderLoadError::NotFound(path.to_path_buf()),
        _ => ShaderLoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let words = parse_spirv(&bytes).map_err(|reason| ShaderLoadError::InvalidBytecode {
        path: path.to_path_buf(),
        reason,
    })?;

    debug!("Loaded shader `{}` ({} words).", path.display(), words.len());

    Ok(ShaderBytecode {
        path: path.to_path_buf(),
        words,
    })
}

pub fn parse_spirv(bytes: &[u8]) -> Result<Vec<u32>, String> {
    if bytes.len() < 4 {
        return Err(format!("{} bytes is too short for a SPIR-V header", bytes.len()));
    }
    if bytes.len() % 4 != 0 {
        return Err(format!("length {} is not a multiple of 4", bytes.len()));
    }

    let bytecode = Bytecode::new(bytes).map_err(|e| format!("{:?}", e))?;
    let words = bytecode.code();

    if words[0] != SPIRV_MAGIC {
        return Err(format!("bad magic number {:#010x}", words[0]));
    }

    Ok(words.to_vec())
}
