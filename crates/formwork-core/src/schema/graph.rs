use crate::{schema::Field, types::FieldId};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

///
/// DerivedOrder
///
/// Evaluation order for derived fields: parents before children, computed
/// once per schema. Fields caught in a dependency cycle are reported in
/// `cyclic` and never appear in `order`; their value stays permanently
/// unset rather than looping.
///

#[derive(Clone, Debug)]
pub(crate) struct DerivedOrder {
    pub order: Vec<FieldId>,
    pub cyclic: BTreeSet<FieldId>,
}

impl DerivedOrder {
    /// Kahn's algorithm over the derived-to-derived parent edges.
    ///
    /// Non-derived parents are plain inputs and impose no ordering; edges
    /// to ids that are not derived fields of this schema are ignored.
    pub(crate) fn compute(fields: &[Field]) -> Self {
        let derived: BTreeSet<FieldId> = fields
            .iter()
            .filter(|f| f.is_derived())
            .map(|f| f.id)
            .collect();

        let mut in_degree: BTreeMap<FieldId, usize> = BTreeMap::new();
        let mut children: BTreeMap<FieldId, Vec<FieldId>> = BTreeMap::new();

        for field in fields.iter().filter(|f| f.is_derived()) {
            let unique_parents: BTreeSet<FieldId> = field
                .parents
                .iter()
                .copied()
                .filter(|p| derived.contains(p))
                .collect();

            in_degree.insert(field.id, unique_parents.len());
            for parent in unique_parents {
                children.entry(parent).or_default().push(field.id);
            }
        }

        // seed in list order so evaluation order is deterministic
        let mut ready: VecDeque<FieldId> = fields
            .iter()
            .filter(|f| f.is_derived())
            .map(|f| f.id)
            .filter(|id| in_degree.get(id) == Some(&0))
            .collect();

        let mut order = Vec::with_capacity(derived.len());
        while let Some(id) = ready.pop_front() {
            order.push(id);

            for child in children.get(&id).cloned().unwrap_or_default() {
                if let Some(degree) = in_degree.get_mut(&child) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(child);
                    }
                }
            }
        }

        let placed: BTreeSet<FieldId> = order.iter().copied().collect();
        let cyclic: BTreeSet<FieldId> = derived.difference(&placed).copied().collect();

        Self { order, cyclic }
    }
}

///
/// TESTS
///
