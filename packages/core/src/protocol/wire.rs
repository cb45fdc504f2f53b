// Wire format
// Length-tagged framing для гибридных шифртекстов/подписей и MessagePack для конвертов

use crate::error::{CryptoError, Result};
use rmp_serde::{Deserializer, Serializer};
use serde::{Deserialize, Serialize};

/// Size of the big-endian length prefix in front of every component.
pub const LENGTH_PREFIX: usize = 4;

/// Склеить компоненты: `u32 BE длина || байты` для каждого, по порядку
pub fn encode_components(components: &[&[u8]]) -> Result<Vec<u8>> {
    let total = components
        .iter()
        .map(|c| LENGTH_PREFIX + c.len())
        .sum::<usize>();
    let mut buffer = Vec::with_capacity(total);

    for component in components {
        let len = u32::try_from(component.len()).map_err(|_| {
            CryptoError::LengthMismatch(format!(
                "component of {} bytes exceeds the u32 length prefix",
                component.len()
            ))
        })?;
        buffer.extend_from_slice(&len.to_be_bytes());
        buffer.extend_from_slice(component);
    }

    Ok(buffer)
}

/// Разобрать ровно `expected` компонентов
///
/// Missing bytes, truncated prefixes and trailing bytes are all
/// `LengthMismatch`.
pub fn split_components(data: &[u8], expected: usize) -> Result<Vec<&[u8]>> {
    let mut components = Vec::with_capacity(expected);
    let mut rest = data;

    for index in 0..expected {
        if rest.len() < LENGTH_PREFIX {
            return Err(CryptoError::LengthMismatch(format!(
                "component {} is missing its length prefix",
                index
            )));
        }
        let (prefix, tail) = rest.split_at(LENGTH_PREFIX);
        let mut len_bytes = [0u8; LENGTH_PREFIX];
        len_bytes.copy_from_slice(prefix);
        let len = u32::from_be_bytes(len_bytes) as usize;

        if tail.len() < len {
            return Err(CryptoError::LengthMismatch(format!(
                "component {} declares {} bytes, {} available",
                index,
                len,
                tail.len()
            )));
        }
        let (component, tail) = tail.split_at(len);
        components.push(component);
        rest = tail;
    }

    if !rest.is_empty() {
        return Err(CryptoError::LengthMismatch(format!(
            "{} trailing bytes after {} components",
            rest.len(),
            expected
        )));
    }

    Ok(components)
}

/// Упаковать произвольные данные в MessagePack
pub fn pack_raw<T: Serialize>(data: &T) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    data.serialize(&mut Serializer::new(&mut buffer))?;
    Ok(buffer)
}

/// Распаковать MessagePack в произвольный тип
pub fn unpack_raw<'a, T: Deserialize<'a>>(data: &'a [u8]) -> Result<T> {
    let mut deserializer = Deserializer::new(data);
    Ok(T::deserialize(&mut deserializer)?)
}
