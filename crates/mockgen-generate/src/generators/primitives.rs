use mockgen_core::{ChoiceSpec, FloatSpec, IntegerSpec, StringSpec};
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::IndexedRandom;
use serde_json::{Number, Value};

use crate::generators::GeneratorContext;

/// Random v4 UUID in lowercase hyphenated form, drawn from the general stream.
pub fn uuid_value(ctx: &mut GeneratorContext<'_>) -> Value {
    let bytes: [u8; 16] = ctx.rng.random();
    Value::String(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
}

pub fn choice_value(spec: &ChoiceSpec, ctx: &mut GeneratorContext<'_>) -> Value {
    if spec.options.is_empty() {
        return Value::Null;
    }

    let weighted = spec
        .weights
        .as_ref()
        .and_then(|weights| WeightedIndex::new(weights).ok());
    let picked = match weighted {
        Some(index) => spec.options.get(index.sample(&mut *ctx.rng)),
        None => spec.options.choose(&mut *ctx.rng),
    };
    picked.cloned().unwrap_or(Value::Null)
}

/// Uniform over the multiples of `10^-decimal_places` inside the bounds.
/// Without such a multiple the bounds win and the value is not rounded.
pub fn float_value(spec: &FloatSpec, ctx: &mut GeneratorContext<'_>) -> Value {
    let value = match spec.precision_grid() {
        Some((low, high)) => {
            let step = if low < high {
                ctx.rng.random_range(low..=high).round()
            } else {
                low
            };
            (step / spec.scale()).clamp(spec.min, spec.max)
        }
        None if spec.min < spec.max => ctx.rng.random_range(spec.min..=spec.max),
        None => spec.min,
    };
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

pub fn integer_value(spec: &IntegerSpec, ctx: &mut GeneratorContext<'_>) -> Value {
    Value::from(ctx.rng.random_range(spec.min..=spec.max))
}

/// Realistic value for the hint when the source knows it, else a random word.
pub fn string_value(spec: &StringSpec, ctx: &mut GeneratorContext<'_>) -> Value {
    let value = spec
        .generator
        .as_deref()
        .and_then(|hint| ctx.source.value(hint))
        .unwrap_or_else(|| ctx.source.word());
    Value::String(value)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::json;

    use super::*;
    use crate::faker_rs::{FakerSource, LocaleKey};
    use crate::model::GenerationReport;

    fn with_ctx<T>(f: impl FnOnce(&mut GeneratorContext<'_>) -> T) -> T {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut source = FakerSource::seeded(LocaleKey::EnUs, 99);
        let mut report = GenerationReport::new("test".to_string(), None, 1);
        let mut ctx = GeneratorContext {
            rng: &mut rng,
            source: &mut source,
            report: &mut report,
        };
        f(&mut ctx)
    }

    #[test]
    fn uuid_is_canonical_v4() {
        let value = with_ctx(uuid_value);
        let text = value.as_str().expect("string uuid");
        let parsed = uuid::Uuid::parse_str(text).expect("parse uuid");
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(text, parsed.hyphenated().to_string());
    }

    #[test]
    fn empty_choice_is_null() {
        let spec = ChoiceSpec {
            options: Vec::new(),
            weights: None,
        };
        assert_eq!(with_ctx(|ctx| choice_value(&spec, ctx)), Value::Null);
    }

    #[test]
    fn zero_weight_option_is_never_picked() {
        let spec = ChoiceSpec {
            options: vec![json!("never"), json!("always")],
            weights: Some(vec![0.0, 1.0]),
        };
        with_ctx(|ctx| {
            for _ in 0..200 {
                assert_eq!(choice_value(&spec, ctx), json!("always"));
            }
        });
    }

    #[test]
    fn floats_are_rounded_to_precision() {
        let spec = FloatSpec {
            min: 0.0,
            max: 10.0,
            decimal_places: 1,
        };
        with_ctx(|ctx| {
            for _ in 0..500 {
                let value = float_value(&spec, ctx).as_f64().expect("number");
                assert!((0.0..=10.0).contains(&value));
                assert_eq!(value, (value * 10.0).round() / 10.0);
            }
        });
    }

    #[test]
    fn rounding_never_escapes_bounds() {
        let spec = FloatSpec {
            min: 1.0,
            max: 1.05,
            decimal_places: 1,
        };
        with_ctx(|ctx| {
            for _ in 0..500 {
                assert_eq!(float_value(&spec, ctx), json!(1.0));
            }
        });
    }

    #[test]
    fn narrow_bounds_keep_precision() {
        let spec = FloatSpec {
            min: 0.001,
            max: 0.029,
            decimal_places: 2,
        };
        let mut seen = Vec::new();
        with_ctx(|ctx| {
            for _ in 0..200 {
                let value = float_value(&spec, ctx).as_f64().expect("number");
                assert!(value == 0.01 || value == 0.02, "unexpected {value}");
                if !seen.contains(&value) {
                    seen.push(value);
                }
            }
        });
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn unreachable_precision_samples_inside_bounds() {
        let spec = FloatSpec {
            min: 0.001,
            max: 0.009,
            decimal_places: 2,
        };
        assert_eq!(spec.precision_grid(), None);
        with_ctx(|ctx| {
            for _ in 0..200 {
                let value = float_value(&spec, ctx).as_f64().expect("number");
                assert!((0.001..=0.009).contains(&value));
            }
        });
    }

    #[test]
    fn degenerate_integer_range_is_constant() {
        let spec = IntegerSpec { min: 7, max: 7 };
        assert_eq!(with_ctx(|ctx| integer_value(&spec, ctx)), json!(7));
    }

    #[test]
    fn unknown_hint_falls_back_to_word() {
        let spec = StringSpec {
            generator: Some("favourite_colour".to_string()),
        };
        let value = with_ctx(|ctx| string_value(&spec, ctx));
        assert!(!value.as_str().expect("string").is_empty());
    }
}
