//! Three-way reconciliation of file maps
//!
//! Every name present in the split point, the current head or the given head
//! is classified by comparing its three versions (absent counts as a
//! version). Names that need no change are left out of the plan.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::FileMap;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileMergeAction {
    /// Only the given branch changed the file (or added it)
    TakeGiven(ObjectId),
    /// Only the given branch deleted the file
    RemoveFile,
    /// Nothing to do: unchanged by the given branch, or changed the same way
    KeepCurrent,
    /// Both sides changed the file differently; deletion counts as a change
    Conflict {
        current: Option<ObjectId>,
        given: Option<ObjectId>,
    },
}

impl FileMergeAction {
    pub fn classify(
        split: Option<&ObjectId>,
        current: Option<&ObjectId>,
        given: Option<&ObjectId>,
    ) -> Self {
        if current == given || split == given {
            return FileMergeAction::KeepCurrent;
        }

        if split == current {
            return match given {
                Some(oid) => FileMergeAction::TakeGiven(oid.clone()),
                None => FileMergeAction::RemoveFile,
            };
        }

        FileMergeAction::Conflict {
            current: current.cloned(),
            given: given.cloned(),
        }
    }
}

pub type MergePlan = BTreeMap<String, FileMergeAction>;

#[derive(Debug)]
pub struct ThreeWayMerge<'t> {
    split: &'t FileMap,
    current: &'t FileMap,
    given: &'t FileMap,
}

impl<'t> ThreeWayMerge<'t> {
    pub fn new(split: &'t FileMap, current: &'t FileMap, given: &'t FileMap) -> Self {
        ThreeWayMerge {
            split,
            current,
            given,
        }
    }

    pub fn plan(&self) -> MergePlan {
        let names = self
            .split
            .keys()
            .chain(self.current.keys())
            .chain(self.given.keys())
            .collect::<BTreeSet<_>>();

        names
            .into_iter()
            .filter_map(|name| {
                let action = FileMergeAction::classify(
                    self.split.get(name),
                    self.current.get(name),
                    self.given.get(name),
                );
                tracing::debug!(file = %name, ?action, "classified");

                (action != FileMergeAction::KeepCurrent).then(|| (name.clone(), action))
            })
            .collect()
    }
}

/// Content written for a conflicted file. A deleted side contributes nothing.
pub fn conflict_content(current: Option<&[u8]>, given: Option<&[u8]>) -> Vec<u8> {
    let mut content = b"<<<<<<< HEAD\n".to_vec();
    content.extend_from_slice(current.unwrap_or_default());
    content.extend_from_slice(b"=======\n");
    content.extend_from_slice(given.unwrap_or_default());
    content.extend_from_slice(b">>>>>>>\n");
    content
}
