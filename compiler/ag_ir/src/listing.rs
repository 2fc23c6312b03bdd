//! Indented dump of an entity subtree, for debugging frontends.

use std::fmt::Write;

use crate::stack::ensure_sufficient_stack;
use crate::{EntityId, EntityTree};

impl EntityTree {
    /// List `id` and its live descendants, one per line.
    ///
    /// Each line is indented by one `-` per level and shows the kind label
    /// and name. References add a `->` line naming what they refer to.
    pub fn listing(&self, id: EntityId) -> String {
        let mut out = String::new();
        self.write_listing(id, 0, &mut out);
        out
    }

    fn write_listing(&self, id: EntityId, depth: usize, out: &mut String) {
        ensure_sufficient_stack(|| {
            let entity = self.get(id);
            if !entity.is_live() {
                return;
            }
            let indent = "-".repeat(depth);
            let _ = writeln!(out, "{indent} {} {}", entity.data().describe(), entity.name());
            if let Some(reference) = self.as_type_reference(id) {
                let _ = writeln!(out, "{indent} -> {}", self.name(reference.referred));
            }
            for &child in entity.children() {
                self.write_listing(child, depth + 1, out);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{EntityTree, FunctionDecl, FunctionKind, Primitive, TypeReference};

    #[test]
    fn lists_kinds_names_and_referred_types() {
        let mut tree = EntityTree::new();
        let root = tree.root();
        let gfx = tree.add_scope(root, "gfx");
        let shape = tree.add_class(gfx, "Shape");
        let area = tree.add_function_group(shape, "area", FunctionKind::MemberFunction);
        tree.add_overload(
            area,
            FunctionDecl::new()
                .returning(TypeReference::new("", Primitive::Double.id()))
                .parameter(TypeReference::new("scale", Primitive::Float.id())),
        );

        let expected = " Scope \n\
- Scope gfx
-- Class Shape
--- Function group area
---- Function area
----- TypeReference scale
----- -> Float
";
        assert_eq!(tree.listing(root), expected);
    }

    #[test]
    fn pruned_entities_are_omitted() {
        let mut tree = EntityTree::new();
        let root = tree.root();
        let gone = tree.add_class(root, "Gone");
        tree.add_class(root, "Kept");
        tree.prune(gone);

        assert_eq!(tree.listing(root), " Scope \n- Class Kept\n");
    }
}
