//! Validated program snapshot model

use crate::error::{MalformedSnapshot, MatrixKind, Result};

/// Units of each resource type, indexed by resource
pub type ResourceVector = Vec<u64>;

/// A validated snapshot of process resource allocation
///
/// Holds the available-resources vector, the maximum-demand and
/// current-allocation matrices (P processes x R resource types), and the
/// remaining need derived from them.
///
/// Invariants, checked once at construction:
/// - both matrices are P x R with the same R as `available`
/// - `maximum[p][r] >= allocation[p][r]` for every cell
/// - P >= 1 and R >= 1
///
/// The snapshot is immutable after construction; the analyzer borrows it and
/// works on its own copy of `available`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    available: ResourceVector,
    maximum: Vec<ResourceVector>,
    allocation: Vec<ResourceVector>,
    need: Vec<ResourceVector>,
}

impl Snapshot {
    /// Validate the raw structures and derive the need matrix
    ///
    /// # Arguments
    /// * `available` - unallocated units per resource type
    /// * `maximum` - total units each process may ever demand, one row per process
    /// * `allocation` - units each process currently holds, same shape as `maximum`
    ///
    /// # Returns
    /// A validated snapshot, or the first [`MalformedSnapshot`] violation found
    pub fn new(
        available: ResourceVector,
        maximum: Vec<ResourceVector>,
        allocation: Vec<ResourceVector>,
    ) -> Result<Self> {
        if maximum.is_empty() || allocation.is_empty() {
            return Err(MalformedSnapshot::Empty.into());
        }
        if available.is_empty() {
            return Err(MalformedSnapshot::NoResources.into());
        }
        if maximum.len() != allocation.len() {
            return Err(MalformedSnapshot::ProcessCountMismatch {
                maximum: maximum.len(),
                allocation: allocation.len(),
            }
            .into());
        }

        let resources = available.len();
        check_rectangular(&maximum, MatrixKind::Maximum, resources)?;
        check_rectangular(&allocation, MatrixKind::Allocation, resources)?;

        // need = maximum - allocation, cell by cell. Underflow means the
        // snapshot claims more units held than the declared maximum, which
        // must fail here rather than wrap.
        let mut need = Vec::with_capacity(maximum.len());
        for (row, (demand, held)) in maximum.iter().zip(&allocation).enumerate() {
            let mut remaining = ResourceVector::with_capacity(resources);
            for (col, (&m, &a)) in demand.iter().zip(held).enumerate() {
                let cell = m.checked_sub(a).ok_or(MalformedSnapshot::NegativeNeed {
                    row,
                    col,
                    maximum: m,
                    allocated: a,
                })?;
                remaining.push(cell);
            }
            need.push(remaining);
        }

        Ok(Self {
            available,
            maximum,
            allocation,
            need,
        })
    }

    /// Number of processes (P)
    #[inline]
    pub fn process_count(&self) -> usize {
        self.maximum.len()
    }

    /// Number of resource types (R)
    #[inline]
    pub fn resource_count(&self) -> usize {
        self.available.len()
    }

    /// Units currently unallocated, per resource type
    #[inline]
    pub fn available(&self) -> &[u64] {
        &self.available
    }

    /// Maximum demand matrix, one row per process
    #[inline]
    pub fn maximum(&self) -> &[ResourceVector] {
        &self.maximum
    }

    /// Current allocation matrix, one row per process
    #[inline]
    pub fn allocation(&self) -> &[ResourceVector] {
        &self.allocation
    }

    /// Remaining need matrix (maximum minus allocation), one row per process
    #[inline]
    pub fn need(&self) -> &[ResourceVector] {
        &self.need
    }
}

fn check_rectangular(
    matrix: &[ResourceVector],
    kind: MatrixKind,
    expected: usize,
) -> Result<()> {
    for (row, columns) in matrix.iter().enumerate() {
        if columns.len() != expected {
            return Err(MalformedSnapshot::RaggedRow {
                matrix: kind,
                row,
                expected,
                got: columns.len(),
            }
            .into());
        }
    }
    Ok(())
}
