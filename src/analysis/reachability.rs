use crate::analysis::handler_parser::split_type_wrappers;
use crate::analysis::registry::TypeRegistry;
use crate::models::{HandlerDescriptor, TypeDescriptor};
use std::collections::{HashSet, VecDeque};

/// Names of every registry type reachable from a handler's input or output
pub fn reachable_type_names(registry: &TypeRegistry, handlers: &[HandlerDescriptor]) -> HashSet<String> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();

    for handler in handlers {
        for written in [&handler.input_type, &handler.output_type] {
            let (_, root) = split_type_wrappers(written);
            if !root.is_empty() && visited.insert(root.to_string()) {
                queue.push_back(root.to_string());
            }
        }
    }

    while let Some(name) = queue.pop_front() {
        let Some(descriptor) = registry.get(&name) else {
            continue;
        };
        for field in &descriptor.fields {
            let Some(resolved) = &field.resolved_type else {
                continue;
            };
            let mut referenced = Vec::new();
            resolved.collect_references(&mut referenced);
            for next in referenced {
                if visited.insert(next.to_string()) {
                    queue.push_back(next.to_string());
                }
            }
        }
    }

    visited
}

/// Registry types reachable from the handlers, in registry insertion order
pub fn filter_used_types(registry: &TypeRegistry, handlers: &[HandlerDescriptor]) -> Vec<TypeDescriptor> {
    let reachable = reachable_type_names(registry, handlers);
    registry
        .types()
        .filter(|t| reachable.contains(&t.name))
        .cloned()
        .collect()
}
