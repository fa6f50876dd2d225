//! Ordered collections of operations submitted as batch update calls

use super::operation::{BatchUpdateRequest, Operation};
use crate::api::models::{FormInfo, FormSettings, Item};

/// An ordered list of operations that the service applies in array order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operations {
    operations: Vec<Operation>,
}

impl Operations {
    /// Create a new empty operations collection
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    /// Create operations from a vector of operations
    pub fn from_operations(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    /// Add a single operation to the collection
    pub fn add(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Add an updateFormInfo operation
    pub fn update_form_info(self, info: FormInfo, update_mask: impl Into<String>) -> Self {
        self.add(Operation::update_form_info(info, update_mask))
    }

    /// Add an updateSettings operation
    pub fn update_settings(self, settings: FormSettings, update_mask: impl Into<String>) -> Self {
        self.add(Operation::update_settings(settings, update_mask))
    }

    /// Add a createItem operation
    pub fn create_item(self, item: Item, index: usize) -> Self {
        self.add(Operation::create_item(item, index))
    }

    /// Add a deleteItem operation
    pub fn delete_item(self, index: usize) -> Self {
        self.add(Operation::delete_item(index))
    }

    /// Get the number of operations in this collection
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Get a reference to the operations vector
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of createItem operations in this collection
    pub fn create_item_count(&self) -> usize {
        self.operations.iter().filter(|op| op.is_create_item()).count()
    }

    /// Split into consecutive chunks of at most `chunk_size` operations.
    ///
    /// Order is preserved across and within chunks, so an operation placed
    /// first (such as a settings replace) always lands in the first chunk.
    pub fn chunks(&self, chunk_size: usize) -> Vec<Operations> {
        if chunk_size == 0 {
            return vec![self.clone()];
        }
        self.operations
            .chunks(chunk_size)
            .map(|chunk| Operations::from_operations(chunk.to_vec()))
            .collect()
    }

    /// Build the request body for a single batch update call
    pub fn to_request(&self) -> BatchUpdateRequest {
        BatchUpdateRequest {
            requests: self.operations.clone(),
            include_form_in_response: None,
        }
    }
}

impl From<Operation> for Operations {
    fn from(operation: Operation) -> Self {
        Self::from_operations(vec![operation])
    }
}

impl From<Vec<Operation>> for Operations {
    fn from(operations: Vec<Operation>) -> Self {
        Self::from_operations(operations)
    }
}

impl IntoIterator for Operations {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Operations {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_ops(count: usize) -> Operations {
        (0..count).fold(Operations::new(), |ops, i| {
            ops.create_item(Item::default(), i)
        })
    }

    #[test]
    fn test_builder_and_counts() {
        let ops = Operations::new()
            .update_settings(FormSettings::not_a_quiz(), "*")
            .create_item(Item::default(), 0)
            .create_item(Item::default(), 1)
            .delete_item(0);

        assert_eq!(ops.len(), 4);
        assert!(!ops.is_empty());
        assert_eq!(ops.create_item_count(), 2);
        assert_eq!(ops.to_request().requests.len(), 4);
    }

    #[test]
    fn test_chunks_preserve_order_and_bound_size() {
        let ops = Operations::new()
            .update_settings(FormSettings::not_a_quiz(), "*")
            .create_item(Item::default(), 0)
            .create_item(Item::default(), 1)
            .create_item(Item::default(), 2)
            .create_item(Item::default(), 3);

        let chunks = ops.chunks(2);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.len() <= 2));
        assert_eq!(chunks[0].operations()[0].operation_type(), "updateSettings");

        let flattened: Vec<Operation> = chunks.into_iter().flatten().collect();
        assert_eq!(flattened, ops.operations().to_vec());
    }

    #[test]
    fn test_chunk_count_is_ceiling() {
        for (count, size, expected) in [(0, 10, 0), (10, 10, 1), (11, 10, 2), (250, 100, 3)] {
            assert_eq!(item_ops(count).chunks(size).len(), expected, "{} ops / {}", count, size);
        }
    }
}
