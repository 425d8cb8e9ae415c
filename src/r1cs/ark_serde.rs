//! serde adapters for arkworks field elements, via compressed bytes.

pub mod vec {
    use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
    use serde::{de::Error as DeError, ser::Error, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(data: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: CanonicalSerialize,
    {
        let mut seq = serializer.serialize_seq(Some(data.len()))?;
        for item in data {
            let mut bytes = vec![];
            item.serialize_compressed(&mut bytes).map_err(S::Error::custom)?;
            seq.serialize_element(&bytes)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: CanonicalDeserialize,
    {
        let encoded: Vec<Vec<u8>> = Vec::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|bytes| T::deserialize_compressed(&bytes[..]).map_err(D::Error::custom))
            .collect()
    }
}

/// Sparse rows: `(variable index, coefficient)` pairs.
pub mod terms {
    use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
    use serde::{de::Error as DeError, ser::Error, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(data: &[(usize, T)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: CanonicalSerialize,
    {
        let mut seq = serializer.serialize_seq(Some(data.len()))?;
        for (idx, coeff) in data {
            let mut bytes = vec![];
            coeff.serialize_compressed(&mut bytes).map_err(S::Error::custom)?;
            seq.serialize_element(&(*idx as u64, bytes))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<(usize, T)>, D::Error>
    where
        D: Deserializer<'de>,
        T: CanonicalDeserialize,
    {
        let encoded: Vec<(u64, Vec<u8>)> = Vec::deserialize(deserializer)?;
        encoded
            .into_iter()
            .map(|(idx, bytes)| {
                let idx = usize::try_from(idx).map_err(D::Error::custom)?;
                let coeff = T::deserialize_compressed(&bytes[..]).map_err(D::Error::custom)?;
                Ok((idx, coeff))
            })
            .collect()
    }
}
