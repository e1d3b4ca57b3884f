use std::cmp;

pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
    pub(crate) height: usize,
}

impl<K, V> Node<K, V> {
    /// Creates a leaf node.
    pub(crate) fn create(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        })
    }

    pub(crate) fn left_height(&self) -> usize {
        height(&self.left)
    }

    pub(crate) fn right_height(&self) -> usize {
        height(&self.right)
    }

    /// Recomputes the cached height from the cached heights of both children.
    pub(crate) fn adjust_height(&mut self) {
        self.height = 1 + cmp::max(self.left_height(), self.right_height());
    }

    /// Height of left subtree minus height of right subtree.
    pub(crate) fn balance_factor(&self) -> isize {
        self.left_height() as isize - self.right_height() as isize
    }
}

pub(crate) fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

#[cfg(test)]
mod tests {
    use super::Node;

    #[test]
    fn test_leaf() {
        let leaf = Node::create(1, "one");
        assert_eq!(leaf.height, 1);
        assert_eq!(leaf.balance_factor(), 0);
    }

    #[test]
    fn test_adjust_height() {
        let mut node = Node::create(2, ());
        node.left = Some(Node::create(1, ()));
        node.adjust_height();
        assert_eq!(node.height, 2);
        assert_eq!(node.balance_factor(), 1);

        let mut right = Node::create(3, ());
        right.right = Some(Node::create(4, ()));
        right.adjust_height();
        node.right = Some(right);
        node.adjust_height();
        assert_eq!(node.height, 3);
        assert_eq!(node.balance_factor(), -1);
    }
}
