// Base64 утилиты (текстовый экспорт публичных ключей)

use base64::{engine::general_purpose, Engine};

pub fn encode(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}

pub fn decode(data: &str) -> Result<Vec<u8>, String> {
    general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| format!("Base64 decode failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ignores_surrounding_whitespace() {
        assert_eq!(decode(" AQID\n").unwrap(), vec![1, 2, 3]);
        assert!(decode("not base64!").is_err());
    }
}
