// --- FILE: drivetree-lib/src/tree.rs ---

use std::collections::HashMap;

use log::{debug, trace};

use crate::record::FileRecord;

/// The result of one [`build_forest`] call.
///
/// Records are kept in fetch order and addressed by index. Parent/child links
/// live in a separate table so no record is ever mutated or aliased.
#[derive(Debug, Clone)]
pub struct Forest {
    records: Vec<FileRecord>,
    /// `children[i]` holds the indices attached under record `i`, in fetch order.
    children: Vec<Vec<usize>>,
    /// Top-level record indices, in fetch order.
    roots: Vec<usize>,
    by_id: HashMap<String, usize>,
}

/// Organizes a flat fetch batch into a forest.
///
/// Each record is attached to the first entry of its own parent list that is
/// a folder in the same batch (and is not the record itself). Anything else
/// becomes a root. This never fails: a broken or cyclic parent reference only
/// changes where a record ends up.
///
/// Identifiers are expected to be unique. With duplicates, lookups resolve to
/// the last record carrying the identifier.
pub fn build_forest(records: Vec<FileRecord>) -> Forest {
    debug!("Building forest from {} records", records.len());

    let by_id: HashMap<String, usize> = records
        .iter()
        .enumerate()
        .map(|(index, record)| (record.id.clone(), index))
        .collect();

    let mut children = vec![Vec::new(); records.len()];
    let mut roots = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let parent = record.parents.iter().find_map(|parent_id| {
            by_id
                .get(parent_id)
                .copied()
                .filter(|&p| p != index && records[p].is_folder())
        });

        match parent {
            Some(parent_index) => {
                trace!(
                    "Attaching {:?} under folder {:?}",
                    record.id,
                    records[parent_index].id
                );
                children[parent_index].push(index);
            }
            None => roots.push(index),
        }
    }

    debug!(
        "Forest has {} top-level entries out of {} records",
        roots.len(),
        records.len()
    );

    Forest {
        records,
        children,
        roots,
        by_id,
    }
}

impl Forest {
    /// Total number of records in the batch, attached or not.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Top-level records in fetch order.
    pub fn roots(&self) -> impl Iterator<Item = &FileRecord> + '_ {
        self.roots.iter().map(|&i| &self.records[i])
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Looks up a top-level record by identifier.
    pub fn root(&self, id: &str) -> Option<&FileRecord> {
        self.by_id
            .get(id)
            .filter(|&&index| self.roots.contains(&index))
            .map(|&i| &self.records[i])
    }

    /// Direct children of the record with `id`, in fetch order.
    /// Unknown identifiers have no children.
    pub fn children_of(&self, id: &str) -> impl Iterator<Item = &FileRecord> + '_ {
        self.by_id
            .get(id)
            .map(|&i| self.children[i].as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&i| &self.records[i])
    }

    /// Number of records that no root can reach.
    ///
    /// Always zero unless the provider handed back a parent cycle; members of
    /// such a cycle are attached to each other and never printed.
    pub fn unreachable_count(&self) -> usize {
        let mut seen = vec![false; self.records.len()];
        let mut stack: Vec<usize> = self.roots.clone();
        let mut reached = 0;
        while let Some(index) = stack.pop() {
            if seen[index] {
                continue;
            }
            seen[index] = true;
            reached += 1;
            stack.extend(&self.children[index]);
        }
        self.records.len() - reached
    }

    pub(crate) fn record(&self, index: usize) -> &FileRecord {
        &self.records[index]
    }

    pub(crate) fn root_indices(&self) -> &[usize] {
        &self.roots
    }

    pub(crate) fn child_indices(&self, index: usize) -> &[usize] {
        &self.children[index]
    }
}
