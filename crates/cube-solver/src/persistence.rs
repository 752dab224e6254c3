//! JSON file format for knowledge bases.
//!
//! ```json
//! {
//!   "metadata": {
//!     "puzzle_size": 3,
//!     "exploration_depth": 5,
//!     "build_time": 1.25,
//!     "total_states": 12345
//!   },
//!   "states": { "<serialized state>": 4 }
//! }
//! ```
//!
//! States are keyed by [`PuzzleModel::export_state`] and written in sorted
//! order so rebuilding the same table produces the same file.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SolverError};
use crate::knowledge::KnowledgeBase;
use crate::puzzle::PuzzleModel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeMetadata {
    pub puzzle_size: usize,
    pub exploration_depth: u32,
    /// Seconds spent building the table.
    pub build_time: f64,
    pub total_states: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeFile {
    pub metadata: KnowledgeMetadata,
    pub states: BTreeMap<String, u32>,
}

impl KnowledgeFile {
    /// Snapshot of `knowledge` for a puzzle of `size`.
    pub fn from_knowledge<P: PuzzleModel>(
        knowledge: &KnowledgeBase<P>,
        size: usize,
        exploration_depth: u32,
        build_time: Duration,
    ) -> Self {
        let states: BTreeMap<String, u32> = knowledge
            .iter()
            .map(|(state, distance)| (state.export_state(), distance))
            .collect();

        Self {
            metadata: KnowledgeMetadata {
                puzzle_size: size,
                exploration_depth,
                build_time: build_time.as_secs_f64(),
                total_states: states.len(),
            },
            states,
        }
    }

    /// Parses every stored state back into a table.
    ///
    /// Fails on the first malformed state or on a state whose size disagrees
    /// with the metadata.
    pub fn to_knowledge<P: PuzzleModel>(&self) -> Result<KnowledgeBase<P>> {
        let expected = self.metadata.puzzle_size;
        let mut knowledge = KnowledgeBase::new();
        for (serialized, &distance) in &self.states {
            let state = P::from_state(serialized)?;
            if state.size() != expected {
                return Err(SolverError::SizeMismatch {
                    expected,
                    found: state.size(),
                });
            }
            knowledge.insert_min(state, distance);
        }
        Ok(knowledge)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBaseBuilder;
    use crate::moves::moves;
    use crate::puzzle::Cube;

    fn table() -> KnowledgeBase<Cube> {
        KnowledgeBaseBuilder::default().build(&Cube::solved(2), &moves(2), 2, None)
    }

    #[test]
    fn test_file_round_trip() {
        let knowledge = table();
        let file = KnowledgeFile::from_knowledge(&knowledge, 2, 2, Duration::from_millis(1500));
        assert_eq!(file.metadata.total_states, knowledge.len());
        assert_eq!(file.metadata.build_time, 1.5);

        let path = std::env::temp_dir().join(format!("cube-solver-kb-{}.json", std::process::id()));
        file.save(&path).unwrap();
        let loaded = KnowledgeFile::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, file);
        let restored: KnowledgeBase<Cube> = loaded.to_knowledge().unwrap();
        assert_eq!(restored.len(), knowledge.len());
        for (state, distance) in knowledge.iter() {
            assert_eq!(restored.get(state), Some(distance));
        }
    }

    #[test]
    fn test_layout_uses_metadata_and_states() {
        let file = KnowledgeFile::from_knowledge(&table(), 2, 2, Duration::ZERO);
        let value = serde_json::to_value(&file).unwrap();
        assert_eq!(value["metadata"]["puzzle_size"], 2);
        assert_eq!(value["metadata"]["exploration_depth"], 2);
        let goal = Cube::solved(2).export_state();
        assert_eq!(value["states"][goal.as_str()], 0);
    }

    #[test]
    fn test_rejects_state_of_other_size() {
        let mut file = KnowledgeFile::from_knowledge(&table(), 2, 2, Duration::ZERO);
        file.states.insert(Cube::solved(3).export_state(), 0);
        assert!(matches!(
            file.to_knowledge::<Cube>(),
            Err(SolverError::SizeMismatch { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn test_rejects_malformed_state() {
        let mut file = KnowledgeFile::from_knowledge(&table(), 2, 2, Duration::ZERO);
        file.states.insert("not a cube".to_string(), 1);
        assert!(matches!(
            file.to_knowledge::<Cube>(),
            Err(SolverError::InvalidState(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let missing = std::env::temp_dir().join("cube-solver-no-such-file.json");
        assert!(matches!(KnowledgeFile::load(missing), Err(SolverError::Io(_))));
    }
}
