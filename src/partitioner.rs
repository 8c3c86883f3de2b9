use std::{ops::Index, thread};

use crate::partition::Partition;

/// Splits row ranges into partitions and runs work over them on scoped threads.
#[derive(Hash, Debug, Clone, PartialEq, Eq, Default)]
pub struct Partitioner {
    partitions: Vec<Partition>
}

impl Index<usize> for Partitioner {
    type Output = Partition;

    fn index(&self, index: usize) -> &Self::Output {
        &self.partitions[index]
    }
}

impl Partitioner {
    pub fn len(&self) -> usize { self.partitions.len() }

    pub fn is_empty(&self) -> bool { self.partitions.is_empty() }

    /// Creates a partitioner with partitions that are mostly equal in size, with no more than a difference of 1.
    /// Never creates more partitions than there are items, and always creates at least one.
    pub fn with_partitions(count: usize, partition_count: usize) -> Self {
        let partition_count = partition_count.clamp(1, count.max(1));
        let partition_size = count / partition_count;

        // Calculates left over items and distributes remainder
        let spread = count % partition_count;
        let mut partitions = Vec::with_capacity(partition_count);
        let mut cursor = 0;
        for partition_index in 0..partition_count {
            let adjusted_partition_size = partition_size + usize::from(partition_index < spread);
            let start = cursor;
            cursor = start + adjusted_partition_size;

            partitions.push(Partition::new(start, cursor));
        }

        Partitioner { partitions }
    }

    /// Parallelizes work among partitions.
    /// Ensures result is aggregated in partition order.
    pub fn parallelized<T, F>(&self, function: F) -> Vec<T>
    where
        F: Fn(&Partition) -> Vec<T> + Sync,
        T: Send
    {
        if self.partitions.len() == 1 {
        // Since only 1 partition, do not use threading.
            return function(&self.partitions[0]);
        }

        let function = &function;
        let mut values: Vec<T> = Vec::new();
        thread::scope(|s| {
            let scope_join_handles: Vec<_> = self.partitions
                .iter()
                .map(|partition| s.spawn(move || function(partition)))
                .collect();

            for scope_join_handle in scope_join_handles {
                match scope_join_handle.join() {
                    Ok(result) => values.extend(result),
                    Err(err) => std::panic::resume_unwind(err)
                }
            }
        });

        values
    }
}
