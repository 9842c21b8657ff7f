//! Serde helpers for money amounts.
//!
//! SQLite stores `Decimal` columns as REAL, so a stored `1.50` reads back as
//! `1.5`. Serializing through these helpers pins every amount to a
//! two-decimal string on the way out, whatever scale the backend returned.

use rust_decimal::Decimal;
use serde::Serializer;

pub fn serialize<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut scaled = *amount;
    scaled.rescale(2);
    serializer.serialize_str(&scaled.to_string())
}

pub fn serialize_opt<S>(amount: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match amount {
        Some(amount) => serialize(amount, serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Price {
        #[serde(serialize_with = "super::serialize")]
        amount: Decimal,
        #[serde(serialize_with = "super::serialize_opt")]
        discount: Option<Decimal>,
    }

    #[test]
    fn amounts_serialize_with_two_decimals() {
        let price = Price {
            amount: dec!(1.5),
            discount: None,
        };
        let json = serde_json::to_value(&price).unwrap();
        assert_eq!(json["amount"], "1.50");
        assert_eq!(json["discount"], serde_json::Value::Null);

        let price = Price {
            amount: dec!(97.6),
            discount: Some(dec!(3)),
        };
        let json = serde_json::to_value(&price).unwrap();
        assert_eq!(json["amount"], "97.60");
        assert_eq!(json["discount"], "3.00");
    }
}
