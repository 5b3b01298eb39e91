//! Built-in operators and products, looked up by name.

use crate::operator::Operator;
use crate::product::{Product, ProductValue};

pub const OPERATOR_NAMES: [&str; 4] = ["diff", "abs_diff", "ratio", "this"];
pub const PRODUCT_NAMES: [&str; 7] = ["mean", "power", "rms", "max", "min", "argmax", "std"];

fn zip_with(a: &[f64], b: &[f64], f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()
}

/// Built-in operator by name.
#[must_use]
pub fn operator(name: &str) -> Option<Operator> {
    let op = match name {
        "diff" => Operator::binary(|a, b| zip_with(a, b, |x, y| x - y)),
        "abs_diff" => Operator::binary(|a, b| zip_with(a, b, |x, y| (x - y).abs())).symmetric(),
        "ratio" => Operator::binary(|a, b| zip_with(a, b, |x, y| x / y)),
        "this" => Operator::unary(|a| a.to_vec()),
        _ => return None,
    };
    Some(op)
}

#[allow(clippy::cast_precision_loss)]
fn mean(v: &[f64]) -> f64 {
    v.iter().sum::<f64>() / v.len() as f64
}

fn power(v: &[f64]) -> f64 {
    let squares: Vec<f64> = v.iter().map(|x| x * x).collect();
    mean(&squares)
}

fn non_empty(v: &[f64]) -> Result<&[f64], String> {
    if v.is_empty() {
        Err("reduction over an empty array".to_string())
    } else {
        Ok(v)
    }
}

/// Index and value of the largest element; the first maximum wins.
#[allow(clippy::cast_precision_loss)]
fn argmax(v: &[f64]) -> Result<ProductValue, String> {
    let v = non_empty(v)?;
    let (index, value) = v
        .iter()
        .copied()
        .enumerate()
        .fold((0, v[0]), |best, (i, x)| if x > best.1 { (i, x) } else { best });
    Ok(ProductValue::Tuple(vec![index as f64, value]))
}

/// Built-in product by name.
#[must_use]
pub fn product(name: &str) -> Option<Product> {
    let p = match name {
        "mean" => Product::new(mean),
        "power" => Product::new(power),
        "rms" => Product::new(|v: &[f64]| power(v).sqrt()),
        "max" => Product::try_new(|v| {
            let v = non_empty(v)?;
            Ok(v.iter().copied().fold(f64::NEG_INFINITY, f64::max).into())
        }),
        "min" => Product::try_new(|v| {
            let v = non_empty(v)?;
            Ok(v.iter().copied().fold(f64::INFINITY, f64::min).into())
        }),
        "argmax" => Product::try_new(argmax),
        "std" => Product::new(|v: &[f64]| {
            let m = mean(v);
            let centered: Vec<f64> = v.iter().map(|x| (x - m).powi(2)).collect();
            mean(&centered).sqrt()
        }),
        _ => return None,
    };
    Some(p)
}
