//! Maps a position in the concatenated, sentinel-joined text back to
//! `(sequence_id, offset_within_sequence)`. A static binary search tree over
//! sentinel positions, laid out heap-style in a flat array so the lookup is
//! cache-friendly even for collections with many sequences. Adapted directly
//! from genedex's `text_id_search_tree.rs`.

#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug, Clone)]
pub struct TextIdSearchTree {
    nodes: Vec<Node>,
    pub sentinel_indices: Vec<usize>,
}

impl TextIdSearchTree {
    /// `sentinel_indices` must be sorted ascending.
    pub fn new_from_sentinel_indices(sentinel_indices: Vec<usize>) -> Self {
        assert!(!sentinel_indices.is_empty());
        assert!(*sentinel_indices.last().unwrap() < isize::MAX as usize);

        let mut max_index_used = 0;
        let max_needed_values = sentinel_indices.len().next_power_of_two() * 2 - 1;
        let mut nodes = vec![Node::new_inner(0); max_needed_values];

        add_nodes(&mut nodes, 0, &sentinel_indices, 0, &mut max_index_used);

        nodes.truncate(max_index_used + 1);
        nodes.shrink_to_fit();

        Self {
            nodes,
            sentinel_indices,
        }
    }

    pub fn backtransform_concatenated_text_index(&self, concatenated_text_index: usize) -> (usize, usize) {
        let sequence_id = self.lookup_sequence_id(concatenated_text_index);

        let offset = if sequence_id == 0 {
            concatenated_text_index
        } else {
            concatenated_text_index - self.sentinel_indices[sequence_id - 1] - 1
        };

        (sequence_id, offset)
    }

    pub fn lookup_sequence_id(&self, concatenated_text_index: usize) -> usize {
        let mut curr_node_index = 0;

        while self.nodes[curr_node_index].is_inner() {
            curr_node_index = if concatenated_text_index <= self.nodes[curr_node_index].get_threshold_for_inner() {
                left_child_index(curr_node_index)
            } else {
                right_child_index(curr_node_index)
            };
        }

        self.nodes[curr_node_index].get_sequence_id_for_leaf()
    }
}

fn add_nodes(
    nodes: &mut [Node],
    curr_node_index: usize,
    indices: &[usize],
    indices_offset: usize,
    max_index_used: &mut usize,
) {
    *max_index_used = (*max_index_used).max(curr_node_index);

    let num_indices = indices.len();

    if num_indices == 1 {
        nodes[curr_node_index] = Node::new_leaf(indices_offset);
        return;
    }

    let curr_offset = if num_indices.is_power_of_two() {
        num_indices / 2
    } else {
        num_indices.next_power_of_two() / 2
    };

    let (left, right) = indices.split_at(curr_offset);
    let threshold = *left.last().unwrap();

    nodes[curr_node_index] = Node::new_inner(threshold);

    add_nodes(nodes, left_child_index(curr_node_index), left, indices_offset, max_index_used);
    add_nodes(
        nodes,
        right_child_index(curr_node_index),
        right,
        indices_offset + curr_offset,
        max_index_used,
    );
}

fn left_child_index(curr_node_index: usize) -> usize {
    curr_node_index * 2 + 1
}

fn right_child_index(curr_node_index: usize) -> usize {
    (curr_node_index + 1) * 2
}

// Encodes the threshold as a non-negative value and a sequence id as its bit-flipped
// (negative) value, so both fit in one isize per node.
#[cfg_attr(feature = "savefile", derive(savefile::savefile_derive::Savefile))]
#[derive(Debug, Clone, Copy)]
struct Node {
    data: isize,
}

impl Node {
    fn new_inner(threshold: usize) -> Self {
        Self {
            data: threshold as isize,
        }
    }

    fn is_inner(&self) -> bool {
        self.data >= 0
    }

    fn get_threshold_for_inner(&self) -> usize {
        self.data as usize
    }

    fn new_leaf(sequence_id: usize) -> Self {
        Self {
            data: !sequence_id as isize,
        }
    }

    fn get_sequence_id_for_leaf(&self) -> usize {
        (!self.data) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_sequence_lookup() {
        let sentinel_indices = vec![10, 21, 32, 50, 68, 140, 141];
        let tree = TextIdSearchTree::new_from_sentinel_indices(sentinel_indices);

        assert_eq!(0, tree.lookup_sequence_id(5));
        assert_eq!(1, tree.lookup_sequence_id(21));
        assert_eq!(0, tree.lookup_sequence_id(0));
        assert_eq!(5, tree.lookup_sequence_id(140));
        assert_eq!(6, tree.lookup_sequence_id(141));
        assert_eq!(3, tree.lookup_sequence_id(33));
        assert_eq!(4, tree.lookup_sequence_id(67));
    }

    #[test]
    fn backtransform_matches_lookup() {
        let sentinel_indices = vec![5, 11];
        let tree = TextIdSearchTree::new_from_sentinel_indices(sentinel_indices);

        assert_eq!(tree.backtransform_concatenated_text_index(0), (0, 0));
        assert_eq!(tree.backtransform_concatenated_text_index(4), (0, 4));
        assert_eq!(tree.backtransform_concatenated_text_index(6), (1, 0));
        assert_eq!(tree.backtransform_concatenated_text_index(10), (1, 4));
    }
}
