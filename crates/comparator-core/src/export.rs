//! Plain nested-collection export of results via `serde`.
//!
//! Trees become nested arrays, product maps become objects, empty nodes and
//! non-finite numbers become `null`.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::comparator::Comparison;
use crate::product::{ProductMap, ProductValue};
use crate::result::{Node, OperatorResult, ProductResult};

fn finite(x: f64) -> Option<f64> {
    x.is_finite().then_some(x)
}

/// Array of samples with non-finite entries as `null`.
struct Samples<'a>(&'a [f64]);

impl Serialize for Samples<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|&x| finite(x)))
    }
}

/// Operator-result tree with sample arrays at the leaves.
struct SampleTree<'a>(&'a Node<Vec<f64>>);

impl Serialize for SampleTree<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Node::Empty => serializer.serialize_none(),
            Node::Leaf(v) => Samples(v).serialize(serializer),
            Node::Branch(children) => serializer.collect_seq(children.iter().map(SampleTree)),
        }
    }
}

impl<T: Serialize> Serialize for Node<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_none(),
            Self::Leaf(v) => v.serialize(serializer),
            Self::Branch(children) => serializer.collect_seq(children),
        }
    }
}

impl Serialize for ProductValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(x) => finite(*x).serialize(serializer),
            Self::Tuple(v) => Samples(v).serialize(serializer),
        }
    }
}

impl Serialize for ProductMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for OperatorResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.labels().is_some() { 3 } else { 2 };
        let mut s = serializer.serialize_struct("OperatorResult", fields)?;
        s.serialize_field("name", self.name())?;
        if let Some(labels) = self.labels() {
            s.serialize_field("labels", labels)?;
        } else {
            s.skip_field("labels")?;
        }
        s.serialize_field("result", &SampleTree(self.root()))?;
        s.end()
    }
}

impl Serialize for ProductResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ProductResult", 2)?;
        s.serialize_field("products", self.product_names())?;
        s.serialize_field("result", self.result())?;
        s.end()
    }
}

/// `name → result` in registration order.
struct Named<'a, T>(&'a [(String, T)]);

impl<T: Serialize> Serialize for Named<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(n, v)| (n, v)))
    }
}

impl Serialize for Comparison {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Comparison", 2)?;
        s.serialize_field("operators", &Named(&self.operators))?;
        s.serialize_field("products", &Named(&self.products))?;
        s.end()
    }
}

/// Export any result type as a JSON value.
pub fn to_json_value<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operator_result_as_nested_arrays() {
        let mut r = OperatorResult::new(
            "diff",
            vec![Node::Branch(vec![Node::Leaf(vec![1.0, f64::NAN])]), Node::Empty],
        );
        assert_eq!(
            to_json_value(&r).unwrap(),
            json!({"name": "diff", "result": [[[1.0, null]], null]})
        );
        r.set_labels(Some(vec!["a".into(), "b".into()])).unwrap();
        assert_eq!(to_json_value(&r).unwrap()["labels"], json!(["a", "b"]));
    }

    #[test]
    fn product_result_as_maps() {
        let leaf: ProductMap = [
            ("mean", ProductValue::Scalar(0.5)),
            ("argmax", ProductValue::Tuple(vec![2.0, f64::INFINITY])),
        ]
        .into_iter()
        .collect();
        let r = ProductResult::new(vec![Node::Branch(vec![Node::Leaf(leaf)]), Node::Empty]);
        assert_eq!(
            to_json_value(&r).unwrap(),
            json!({
                "products": ["mean", "argmax"],
                "result": [[{"mean": 0.5, "argmax": [2.0, null]}], null]
            })
        );
    }

    #[test]
    fn comparison_keys_follow_registration_order() {
        let comparison = Comparison {
            operators: vec![
                ("b".to_string(), OperatorResult::new("b", Vec::new())),
                ("a".to_string(), OperatorResult::new("a", Vec::new())),
            ],
            products: Vec::new(),
        };
        let text = serde_json::to_string(&comparison).unwrap();
        let b = text.find("\"b\"").unwrap();
        let a = text.find("\"a\"").unwrap();
        assert!(b < a, "{text}");
    }
}
