use crate::{Document, DocumentError, Element, NodeId, Pass};
use std::str::FromStr;
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::{debug, warn};

/// Command lists whose entries carry an `<Order>` that must form a dense
/// 1-based sequence.
const ORDERED_LISTS: [(&str, &str); 3] = [
    ("FirstLogonCommands", "SynchronousCommand"),
    ("RunSynchronous", "RunSynchronousCommand"),
    ("LogonCommands", "AsynchronousCommand"),
];

/// A rewrite applied to a finished document. Each one is idempotent and
/// they run in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, Display)]
pub enum Optimization {
    PruneEmpty,
    RenumberCommands,
    CanonicalPassOrder,
}

impl Optimization {
    /// Apply this rewrite, returning how many elements it touched.
    pub fn apply(&self, document: &mut Document) -> Result<usize, DocumentError> {
        let root = document.root().ok_or(DocumentError::MissingRoot)?;
        match self {
            Optimization::PruneEmpty => Ok(prune(document, root)),
            Optimization::RenumberCommands => renumber(document),
            Optimization::CanonicalPassOrder => Ok(reorder_passes(document, root)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptimizeSummary {
    pub applied: Vec<(Optimization, usize)>,
    pub skipped: Vec<(Optimization, String)>,
}

/// Run every optimization in order. A failing optimization is logged and
/// skipped; it never aborts the others.
pub fn optimize(document: &mut Document) -> OptimizeSummary {
    let mut summary = OptimizeSummary::default();

    for optimization in Optimization::iter() {
        match optimization.apply(document) {
            Ok(changed) => {
                debug!(optimization = %optimization, changed, "Applied optimization");
                summary.applied.push((optimization, changed));
            }
            Err(error) => {
                warn!(optimization = %optimization, error = %error, "Skipping optimization");
                summary.skipped.push((optimization, error.to_string()));
            }
        }
    }
    summary
}

/// Remove empty elements bottom-up. The root is never removed.
fn prune(document: &mut Document, id: NodeId) -> usize {
    let mut removed = 0;
    let children = document.children(id).to_vec();
    let mut kept = Vec::with_capacity(children.len());

    for child in children {
        removed += prune(document, child);
        if document[child].is_empty() {
            removed += 1;
        } else {
            kept.push(child);
        }
    }

    document.set_children(id, kept);
    removed
}

fn order_of(document: &Document, entry: NodeId) -> Result<u32, DocumentError> {
    match document.find_child(entry, "Order") {
        None => Ok(u32::MAX),
        Some(order) => {
            let text = document[order].trimmed_text().unwrap_or_default();
            text.parse().map_err(|_| DocumentError::InvalidOrder {
                location: document[entry].name.clone(),
                value: text.to_string(),
            })
        }
    }
}

/// Sort each ordered command list by its current `Order` (stable) and assign
/// 1..N. All lists are checked before anything is modified.
fn renumber(document: &mut Document) -> Result<usize, DocumentError> {
    let mut plans = Vec::new();

    for (list, entry) in ORDERED_LISTS {
        for parent in document.find_all(list) {
            let slots: Vec<(usize, NodeId)> = document
                .children(parent)
                .iter()
                .copied()
                .enumerate()
                .filter(|&(_, child)| document[child].name == entry)
                .collect();

            let mut ranked = Vec::with_capacity(slots.len());
            for &(_, child) in &slots {
                ranked.push((order_of(document, child)?, child));
            }
            ranked.sort_by_key(|&(order, _)| order);

            plans.push((parent, slots, ranked));
        }
    }

    let mut changed = 0;
    for (parent, slots, ranked) in plans {
        let mut children = document.children(parent).to_vec();
        for (&(slot, _), &(_, entry)) in slots.iter().zip(ranked.iter()) {
            children[slot] = entry;
        }
        document.set_children(parent, children);

        for (index, (previous, entry)) in ranked.into_iter().enumerate() {
            let order = index as u32 + 1;
            if previous == order {
                continue;
            }
            let value = order.to_string();
            match document.find_child(entry, "Order") {
                Some(existing) => document[existing].text = Some(value),
                None => {
                    let element = document.append(entry, Element::new("Order").with_text(value));
                    // Order always leads its entry
                    let mut children = document.children(entry).to_vec();
                    children.pop();
                    children.insert(0, element);
                    document.set_children(entry, children);
                }
            }
            changed += 1;
        }
    }
    Ok(changed)
}

/// Sort recognized `<settings>` blocks into execution order within the slots
/// they already occupy. Other root children keep their positions.
fn reorder_passes(document: &mut Document, root: NodeId) -> usize {
    let mut children = document.children(root).to_vec();

    let slots: Vec<(usize, Pass)> = children
        .iter()
        .enumerate()
        .filter(|&(_, &child)| document[child].name == "settings")
        .filter_map(|(slot, &child)| {
            document[child]
                .attribute("pass")
                .and_then(|pass| Pass::from_str(pass).ok())
                .map(|pass| (slot, pass))
        })
        .collect();

    let mut sorted: Vec<(Pass, NodeId)> = slots
        .iter()
        .map(|&(slot, pass)| (pass, children[slot]))
        .collect();
    sorted.sort_by_key(|&(pass, _)| pass);

    let mut moved = 0;
    for (&(slot, _), &(_, block)) in slots.iter().zip(sorted.iter()) {
        if children[slot] != block {
            children[slot] = block;
            moved += 1;
        }
    }

    document.set_children(root, children);
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Architecture, writer};

    fn commands(orders: &[&str]) -> Document {
        let mut document = Document::with_root(Architecture::Amd64).unwrap();
        let component = document
            .get_or_create_component(Pass::OobeSystem, "Microsoft-Windows-Shell-Setup")
            .unwrap();
        let list = document.get_or_create_child(component, "FirstLogonCommands");
        for (i, order) in orders.iter().enumerate() {
            let command = document.append(
                list,
                Element::new("SynchronousCommand").with_attribute("wcm:action", "add"),
            );
            document.add_element(command, "Order", Some(order));
            document.add_value(command, "CommandLine", format!("cmd{i}"));
        }
        document
    }

    fn command_lines(document: &Document) -> Vec<(String, String)> {
        document
            .find_all("SynchronousCommand")
            .into_iter()
            .map(|id| {
                (
                    document.child_text(id, "Order").unwrap_or_default().to_string(),
                    document.child_text(id, "CommandLine").unwrap_or_default().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn prune_removes_empty_chains() {
        let mut document = Document::with_root(Architecture::Amd64).unwrap();
        let root = document.root().unwrap();
        let outer = document.append(root, Element::new("Outer"));
        let inner = document.append(outer, Element::new("Inner"));
        document.append(inner, Element::new("Blank").with_text("   "));
        document.append(root, Element::new("Keep").with_attribute("a", "b"));

        let removed = Optimization::PruneEmpty.apply(&mut document).unwrap();

        assert_eq!(removed, 3);
        assert_eq!(document.children(root).len(), 1);
        assert_eq!(document.find_all("Keep").len(), 1);
    }

    #[test]
    fn prune_keeps_root_and_empty_scaffold_goes() {
        let mut document = Document::with_root(Architecture::Amd64).unwrap();
        document.get_or_create_settings(Pass::Generalize).unwrap();

        // Settings blocks carry a pass attribute and are never empty
        assert_eq!(Optimization::PruneEmpty.apply(&mut document).unwrap(), 0);
        assert!(document.root().is_some());
    }

    #[test]
    fn renumber_is_stable() {
        let mut document = commands(&["5", "2", "5", "10"]);

        Optimization::RenumberCommands.apply(&mut document).unwrap();

        assert_eq!(
            command_lines(&document),
            vec![
                ("1".to_string(), "cmd1".to_string()),
                ("2".to_string(), "cmd0".to_string()),
                ("3".to_string(), "cmd2".to_string()),
                ("4".to_string(), "cmd3".to_string()),
            ]
        );
    }

    #[test]
    fn renumber_failure_is_skipped() {
        let mut document = commands(&["2", "first"]);
        let before = document.clone();

        let summary = optimize(&mut document);

        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].0, Optimization::RenumberCommands);
        assert_eq!(summary.applied.len(), 2);
        assert_eq!(command_lines(&document), command_lines(&before));
    }

    #[test]
    fn passes_sorted_unknown_kept_in_place() {
        let mut document = Document::with_root(Architecture::Amd64).unwrap();
        let root = document.root().unwrap();
        for pass in ["oobeSystem", "custom", "windowsPE", "specialize"] {
            let settings =
                document.append(root, Element::new("settings").with_attribute("pass", pass));
            document.append(settings, Element::new("Marker").with_text(pass));
        }

        Optimization::CanonicalPassOrder.apply(&mut document).unwrap();

        let order: Vec<&str> = document
            .settings_blocks()
            .into_iter()
            .filter_map(|id| document[id].attribute("pass"))
            .collect();
        assert_eq!(order, vec!["windowsPE", "custom", "specialize", "oobeSystem"]);
    }

    #[test]
    fn optimize_is_idempotent() {
        let mut document = commands(&["3", "1", "2"]);
        let root = document.root().unwrap();
        document.append(root, Element::new("Empty"));
        let settings = document.append(root, Element::new("settings").with_attribute("pass", "windowsPE"));
        document.append(settings, Element::new("Empty"));

        optimize(&mut document);
        let once = document.clone();
        optimize(&mut document);

        assert_eq!(document, once);
        assert_eq!(
            writer::to_string(&document, &Default::default()).unwrap(),
            writer::to_string(&once, &Default::default()).unwrap()
        );
    }
}
