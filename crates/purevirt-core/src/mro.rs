//! C3 linearization of class ancestors.

use std::sync::Arc;

use crate::class::ClassRef;
use crate::types::PureVirtualError;

/// Ancestors of a class with the given bases, nearest first. The class itself
/// is not part of the result.
pub fn linearize(class: &str, bases: &[ClassRef]) -> Result<Vec<ClassRef>, PureVirtualError> {
    let mut sequences: Vec<Vec<ClassRef>> = bases
        .iter()
        .map(|base| {
            let mut seq = Vec::with_capacity(base.mro().len() + 1);
            seq.push(Arc::clone(base));
            seq.extend(base.mro().iter().cloned());
            seq
        })
        .collect();
    sequences.push(bases.to_vec());

    let mut result = Vec::new();
    loop {
        sequences.retain(|seq| !seq.is_empty());
        if sequences.is_empty() {
            return Ok(result);
        }

        // A good head appears in no sequence tail.
        let next = sequences
            .iter()
            .map(|seq| &seq[0])
            .find(|head| {
                !sequences
                    .iter()
                    .any(|seq| seq[1..].iter().any(|c| Arc::ptr_eq(c, head)))
            })
            .cloned();

        let Some(next) = next else {
            return Err(PureVirtualError::InconsistentHierarchy {
                class: class.to_string(),
                bases: bases.iter().map(|b| b.name().to_string()).collect(),
            });
        };

        for seq in &mut sequences {
            if Arc::ptr_eq(&seq[0], &next) {
                seq.remove(0);
            }
        }
        result.push(next);
    }
}
