//! Object graph formatter for the browser console sink
//!
//! Objects are flattened into JSON objects keyed `"<visibility> <name>"`
//! with a leading `___class_name` entry. Each object tree, nested ones
//! included, is wrapped in a one-element array. Every object reached during one
//! walk is remembered by identity; meeting it again yields a
//! `recursion - parent object [Type]` marker instead of descending, which
//! keeps cyclic graphs finite. Anything that is not an object is rendered
//! by a `{message}` line formatter.

use super::{Formatter, LineFormatter};
use crate::core::{LogContext, ObjectRef, Severity, Value};
use std::collections::HashSet;

const CLASS_NAME_KEY: &str = "___class_name";

#[derive(Debug, Clone)]
pub struct TreeFormatter {
    line: LineFormatter,
}

impl TreeFormatter {
    pub fn new() -> Self {
        Self {
            line: LineFormatter::new("{message}"),
        }
    }

    /// The formatter used for everything that is not an object.
    pub fn line_formatter(&self) -> &LineFormatter {
        &self.line
    }

    fn walk_object(
        &self,
        level: Severity,
        obj: &ObjectRef,
        context: &LogContext,
        visited: &mut HashSet<usize>,
    ) -> serde_json::Value {
        visited.insert(obj.id());

        let mut tree = serde_json::Map::new();
        tree.insert(
            CLASS_NAME_KEY.to_string(),
            serde_json::Value::String(obj.type_name().to_string()),
        );

        for field in obj.fields() {
            let key = format!("{} {}", field.tag(), field.name);
            let value = self.walk_value(level, &field.value, context, visited);
            tree.insert(key, value);
        }

        serde_json::Value::Object(tree)
    }

    fn walk_value(
        &self,
        level: Severity,
        value: &Value,
        context: &LogContext,
        visited: &mut HashSet<usize>,
    ) -> serde_json::Value {
        match value {
            Value::Object(child) if visited.contains(&child.id()) => serde_json::Value::String(
                format!("recursion - parent object [{}]", child.type_name()),
            ),
            Value::Object(child) => {
                serde_json::Value::Array(vec![self.walk_object(level, child, context, visited)])
            }
            Value::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|item| self.walk_value(level, item, context, visited))
                    .collect(),
            ),
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), self.walk_value(level, item, context, visited)))
                    .collect(),
            ),
            other => serde_json::Value::String(self.line.format(level, other, context)),
        }
    }
}

impl Default for TreeFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for TreeFormatter {
    type Output = serde_json::Value;

    /// An object renders as a one-element array holding its tree; any
    /// other message renders as a JSON string.
    fn format(&self, level: Severity, message: &Value, context: &LogContext) -> serde_json::Value {
        match message {
            Value::Object(obj) => {
                let mut visited = HashSet::new();
                serde_json::Value::Array(vec![self.walk_object(level, obj, context, &mut visited)])
            }
            other => serde_json::Value::String(self.line.format(level, other, context)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Describe, Field};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::{Arc, Weak};

    struct SelfRef {
        this: Weak<SelfRef>,
    }

    impl Describe for SelfRef {
        fn type_name(&self) -> &str {
            "SelfRef"
        }

        fn describe_fields(&self) -> Vec<Field> {
            vec![
                Field::public("name", "root"),
                Field::private("this", self.this.upgrade().map(Value::object)),
            ]
        }
    }

    struct Parent {
        children: Mutex<Vec<Arc<Child>>>,
    }

    struct Child {
        id: i64,
        parent: Weak<Parent>,
    }

    impl Describe for Parent {
        fn type_name(&self) -> &str {
            "Parent"
        }

        fn describe_fields(&self) -> Vec<Field> {
            let children: Vec<Value> = self
                .children
                .lock()
                .iter()
                .map(|child| Value::object(Arc::clone(child)))
                .collect();
            vec![
                Field::protected("children", children),
                Field::public("count", 2).shared(),
            ]
        }
    }

    impl Describe for Child {
        fn type_name(&self) -> &str {
            "Child"
        }

        fn describe_fields(&self) -> Vec<Field> {
            vec![
                Field::public("id", self.id),
                Field::private("parent", self.parent.upgrade().map(Value::object)),
            ]
        }
    }

    fn count_markers(value: &serde_json::Value) -> usize {
        match value {
            serde_json::Value::String(s) if s.starts_with("recursion - parent object") => 1,
            serde_json::Value::Array(items) => items.iter().map(count_markers).sum(),
            serde_json::Value::Object(map) => map.values().map(count_markers).sum(),
            _ => 0,
        }
    }

    #[test]
    fn test_scalar_delegates_to_line_formatter() {
        let formatter = TreeFormatter::new();
        let out = formatter.format(Severity::Info, &Value::from("hello"), &LogContext::new());
        assert_eq!(out, json!("hello"));

        let out = formatter.format(Severity::Info, &Value::from(vec![1, 2]), &LogContext::new());
        assert_eq!(out, json!(r#"["1","2"]"#));
    }

    #[test]
    fn test_scalar_interpolates_origin_context() {
        let formatter = TreeFormatter::new();
        let caller = LogContext::new().with_field("id", 7);
        let out = formatter.format(
            Severity::Info,
            &Value::from("job {id} done"),
            &LogContext::wrap_origin(&caller),
        );
        assert_eq!(out, json!("job 7 done"));
    }

    #[test]
    fn test_self_reference_renders_one_marker() {
        let node = Arc::new_cyclic(|this| SelfRef { this: this.clone() });
        let formatter = TreeFormatter::new();
        let out = formatter.format(Severity::Debug, &Value::object(node), &LogContext::new());

        assert_eq!(
            out,
            json!([{
                "___class_name": "SelfRef",
                "public name": "root",
                "private this": "recursion - parent object [SelfRef]"
            }])
        );
        assert_eq!(count_markers(&out), 1);
    }

    #[test]
    fn test_parent_child_cycle() {
        let parent = Arc::new(Parent {
            children: Mutex::new(Vec::new()),
        });
        for id in 1..=2 {
            parent.children.lock().push(Arc::new(Child {
                id,
                parent: Arc::downgrade(&parent),
            }));
        }

        let formatter = TreeFormatter::new();
        let out = formatter.format(
            Severity::Info,
            &Value::object(Arc::clone(&parent)),
            &LogContext::new(),
        );

        let root = &out[0];
        assert_eq!(root["___class_name"], "Parent");
        assert_eq!(root["public static count"], "2");
        assert_eq!(root["protected children"][0][0]["public id"], "1");
        assert_eq!(
            root["protected children"][1][0]["private parent"],
            "recursion - parent object [Parent]"
        );
        assert_eq!(count_markers(&out), 2);
    }

    #[test]
    fn test_shared_child_is_marked_on_second_visit() {
        struct Leaf;

        impl Describe for Leaf {
            fn type_name(&self) -> &str {
                "Leaf"
            }

            fn describe_fields(&self) -> Vec<Field> {
                Vec::new()
            }
        }

        struct Pair {
            left: Arc<Leaf>,
            right: Arc<Leaf>,
        }

        impl Describe for Pair {
            fn type_name(&self) -> &str {
                "Pair"
            }

            fn describe_fields(&self) -> Vec<Field> {
                vec![
                    Field::public("left", Value::object(Arc::clone(&self.left))),
                    Field::public("right", Value::object(Arc::clone(&self.right))),
                ]
            }
        }

        let leaf = Arc::new(Leaf);
        let pair = Pair {
            left: Arc::clone(&leaf),
            right: leaf,
        };
        let out = TreeFormatter::new().format(
            Severity::Info,
            &Value::object(Arc::new(pair)),
            &LogContext::new(),
        );

        assert_eq!(out[0]["public left"], json!([{ "___class_name": "Leaf" }]));
        assert_eq!(out[0]["public right"], "recursion - parent object [Leaf]");
    }
}
