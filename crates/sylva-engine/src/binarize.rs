//! Head-outward binarization.
//!
//! A node with more than two children is rebuilt around its head child:
//! right siblings are attached first, then left siblings, each step adding
//! an intermediate `@LABEL` node. The outermost step keeps the original
//! label, so parents still see the same category.

use crate::heads::head_child;
use crate::tree::Tree;

pub(crate) fn binarize(tree: &Tree) -> Tree {
    if tree.is_leaf() || tree.is_preterminal() {
        return tree.clone();
    }
    let head = head_child(tree);
    let children: Vec<Tree> = tree.children().iter().map(binarize).collect();
    if children.len() <= 2 {
        return Tree::phrase(tree.label(), children);
    }
    fold_around_head(tree.label(), children, head)
}

fn fold_around_head(label: &str, mut children: Vec<Tree>, head: usize) -> Tree {
    let head_index = head.min(children.len().saturating_sub(1));
    let right = children.split_off(head_index + 1);
    let mut left = children;
    let Some(mut current) = left.pop() else {
        return Tree::phrase(label, right);
    };

    let intermediate = format!("@{label}");
    let mut remaining = left.len() + right.len();
    let step_label = |still_pending: usize| {
        if still_pending == 0 {
            label.to_owned()
        } else {
            intermediate.clone()
        }
    };

    for sibling in right {
        remaining -= 1;
        current = Tree::phrase(step_label(remaining), vec![current, sibling]);
    }
    for sibling in left.into_iter().rev() {
        remaining -= 1;
        current = Tree::phrase(step_label(remaining), vec![sibling, current]);
    }
    current
}
