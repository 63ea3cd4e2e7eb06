//! Unbalanced binary search tree

use std::cmp::Ordering;
use std::fmt;

struct TreeNode<T> {
    data: T,
    left: Option<Box<TreeNode<T>>>,
    right: Option<Box<TreeNode<T>>>,
}

/// Plain binary search tree. Equal keys go to the right subtree.
///
/// Sorted input degenerates into a chain as deep as the tree is long, so
/// nothing here recurses over nodes, dropping included.
pub struct BinarySearchTree<T> {
    root: Option<Box<TreeNode<T>>>,
    len: usize,
}

impl<T> Default for BinarySearchTree<T> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<T: Ord> BinarySearchTree<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, data: T) {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if data < node.data {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(Box::new(TreeNode {
            data,
            left: None,
            right: None,
        }));
        self.len += 1;
    }

    pub fn contains(&self, target: &T) -> bool {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match target.cmp(&node.data) {
                Ordering::Equal => return true,
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        false
    }
}

impl<T> BinarySearchTree<T> {
    /// Elements in ascending order
    pub fn in_order(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack: Vec<&TreeNode<T>> = Vec::new();
        let mut current = self.root.as_deref();

        while current.is_some() || !stack.is_empty() {
            while let Some(node) = current {
                stack.push(node);
                current = node.left.as_deref();
            }
            if let Some(node) = stack.pop() {
                out.push(&node.data);
                current = node.right.as_deref();
            }
        }

        out
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Drop for BinarySearchTree<T> {
    fn drop(&mut self) {
        let mut stack: Vec<Box<TreeNode<T>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for BinarySearchTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.in_order()).finish()
    }
}

impl<T: Ord> FromIterator<T> for BinarySearchTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        for item in iter {
            tree.insert(item);
        }
        tree
    }
}
