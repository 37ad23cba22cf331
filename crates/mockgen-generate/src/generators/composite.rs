use mockgen_core::{ArraySpec, ElementSpec, ObjectSpec};
use rand::Rng;
use rand::seq::index;
use serde_json::{Map, Value};

use crate::generators::{GeneratorContext, generate_value};

/// Sub-record with one value per nested field, in declaration order.
pub fn object_value(spec: &ObjectSpec, ctx: &mut GeneratorContext<'_>) -> Value {
    let mut record = Map::with_capacity(spec.fields.len());
    for (name, child) in &spec.fields {
        record.insert(name.clone(), generate_value(child, ctx));
    }
    Value::Object(record)
}

pub fn array_value(spec: &ArraySpec, ctx: &mut GeneratorContext<'_>) -> Value {
    let len = ctx.rng.random_range(spec.min_items..=spec.max_items);
    let items = match &spec.elements {
        ElementSpec::Sample(options) => {
            let amount = len.min(options.len());
            index::sample(&mut *ctx.rng, options.len(), amount)
                .into_iter()
                .map(|i| options[i].clone())
                .collect()
        }
        ElementSpec::Generated(element) => (0..len).map(|_| generate_value(element, ctx)).collect(),
        ElementSpec::Words => (0..len).map(|_| Value::String(ctx.source.word())).collect(),
    };
    Value::Array(items)
}
