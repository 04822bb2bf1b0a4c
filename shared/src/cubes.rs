//! The fixed set of lettered cubes that boards are dealt from

use crate::error::ResourceError;
use crate::BOARD_SIZE;
use std::path::Path;

/// Letter faces on a single cube
pub const CUBE_FACES: usize = 6;

/// One cube per board cell
pub const CUBE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

pub type Cube = [char; CUBE_FACES];

/// Classic 16-cube set. `Q` stands for the combined "Qu" face.
const CLASSIC_CUBES: [&str; CUBE_COUNT] = [
    "AACIOT", "ABILTY", "ABJMOQ", "ACDEMP", "ACELRS", "ADENVZ", "AHMORS", "BIFORX", "DENOSW",
    "DKNOTU", "EEFHIY", "EGKLUY", "EGINTV", "EHINPS", "ELPSTU", "GILRUW",
];

/// Immutable pool of exactly [`CUBE_COUNT`] cubes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubePool {
    cubes: Vec<Cube>,
}

impl CubePool {
    pub fn new(cubes: Vec<Cube>) -> Result<Self, ResourceError> {
        if cubes.len() != CUBE_COUNT {
            return Err(ResourceError::CubeCount {
                expected: CUBE_COUNT,
                found: cubes.len(),
            });
        }
        Ok(Self { cubes })
    }

    /// The standard cube set, available without any resource file
    pub fn classic() -> Self {
        let cubes = CLASSIC_CUBES
            .iter()
            .map(|faces| {
                let mut cube = [' '; CUBE_FACES];
                for (slot, face) in cube.iter_mut().zip(faces.chars()) {
                    *slot = face;
                }
                cube
            })
            .collect();
        Self { cubes }
    }

    /// Parses the cube file format: one cube per line, six letters per cube.
    ///
    /// Blank lines are ignored, letters are uppercased.
    pub fn parse(text: &str) -> Result<Self, ResourceError> {
        let mut cubes = Vec::with_capacity(CUBE_COUNT);

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let faces: Vec<char> = line.chars().map(|c| c.to_ascii_uppercase()).collect();
            if faces.len() != CUBE_FACES || !faces.iter().all(char::is_ascii_alphabetic) {
                return Err(ResourceError::CubeFaces {
                    line: index + 1,
                    expected: CUBE_FACES,
                    found: line.to_string(),
                });
            }

            let mut cube = [' '; CUBE_FACES];
            cube.copy_from_slice(&faces);
            cubes.push(cube);
        }

        Self::new(cubes)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }
}
