use crate::domain::model::{
    AttributeCategory, AttributeDictionary, DictionaryEntry, NamedAttribute, NormalizedStore,
    RawStore,
};
use crate::utils::error::{DecodeError, EtlError, Result};

/// Decodes one bitstring against its positional dictionary.
///
/// Every `'1'` at position `i` yields `dictionary[i]` as a [`NamedAttribute`],
/// in ascending position order. The bitstring must have exactly one character
/// per dictionary entry and contain nothing but `'0'` and `'1'`.
pub fn decode_category(
    bits: &str,
    dictionary: &[DictionaryEntry],
) -> std::result::Result<Vec<NamedAttribute>, DecodeError> {
    let bit_count = bits.chars().count();
    if bit_count != dictionary.len() {
        return Err(DecodeError::LengthMismatch {
            bits: bit_count,
            entries: dictionary.len(),
        });
    }

    let mut attributes = Vec::new();
    for (position, (bit, entry)) in bits.chars().zip(dictionary).enumerate() {
        match bit {
            '1' => attributes.push(NamedAttribute::from(entry)),
            '0' => {}
            found => return Err(DecodeError::InvalidBitCharacter { position, found }),
        }
    }

    Ok(attributes)
}

/// Decodes all four bit-encoded fields of `raw`.
///
/// Fails on the first category that does not decode; no partial record is returned.
pub fn decode_record(raw: &RawStore, dictionary: &AttributeDictionary) -> Result<NormalizedStore> {
    let decode = |category: AttributeCategory| {
        decode_category(raw.bits(category), dictionary.entries(category)).map_err(|source| {
            EtlError::Decode {
                store_id: raw.id,
                category,
                source,
            }
        })
    };

    Ok(NormalizedStore {
        id: raw.id,
        name: raw.name.clone(),
        postal_code: raw.postal_code.clone(),
        address: raw.address.clone(),
        latitude: raw.latitude,
        longitude: raw.longitude,
        url: raw.url.clone(),
        closed_day: raw.closed_day.clone(),
        comment: raw.comment.clone(),
        business_hours: decode(AttributeCategory::BusinessHours)?,
        services: decode(AttributeCategory::Services)?,
        products: decode(AttributeCategory::Products)?,
        payments: decode(AttributeCategory::Payments)?,
    })
}

/// Decodes a batch in input order, aborting on the first failing store.
pub fn decode_all(raws: &[RawStore], dictionary: &AttributeDictionary) -> Result<Vec<NormalizedStore>> {
    let stores = raws
        .iter()
        .map(|raw| decode_record(raw, dictionary))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!("Decoded {} stores", stores.len());
    Ok(stores)
}
