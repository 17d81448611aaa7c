use crate::gfx::PointDIP;
use crate::layout::OwnedUITree;
use crate::layout::model::UIKey;

/// Collects the chain from the root down to `key`, root first.
pub fn ancestry_path<Message>(tree: &OwnedUITree<Message>, key: UIKey) -> Vec<UIKey> {
    let mut path = Vec::new();
    let mut current = Some(key);
    while let Some(k) = current {
        path.push(k);
        current = tree.slots[k].parent;
    }
    path.reverse();
    path
}

/// Finds the innermost element containing `point`. Later siblings sit in
/// front of earlier ones, so children are probed back to front.
pub fn hit_test<Message>(
    tree: &OwnedUITree<Message>,
    key: UIKey,
    point: PointDIP,
) -> Option<UIKey> {
    let element = &tree.slots[key];
    if !point.within(element.bounds().border_box) {
        return None;
    }

    for &child in element.children.iter().rev() {
        if let Some(hit) = hit_test(tree, child, point) {
            return Some(hit);
        }
    }

    Some(key)
}

/// Pre-order traversal of the whole tree.
pub fn descendants<Message>(tree: &OwnedUITree<Message>, key: UIKey) -> Vec<UIKey> {
    let mut keys = Vec::new();
    let mut stack = vec![key];
    while let Some(k) = stack.pop() {
        keys.push(k);
        for &child in tree.slots[k].children.iter().rev() {
            stack.push(child);
        }
    }
    keys
}
