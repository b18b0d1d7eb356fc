use std::io;
use std::path::Path;
use tokenizers::{PaddingParams, Tokenizer, TruncationParams, TruncationStrategy};

/// Resolves `tokenizer.json` from a model directory, or accepts the file path itself.
pub fn load_tokenizer(model_path: &Path) -> io::Result<Tokenizer> {
    let tokenizer_path = if model_path
        .file_name()
        .is_some_and(|name| name == std::ffi::OsStr::new("tokenizer.json"))
    {
        model_path.to_path_buf()
    } else if model_path.is_dir() {
        model_path.join("tokenizer.json")
    } else {
        model_path
            .parent()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Model path has no parent"))?
            .join("tokenizer.json")
    };

    Tokenizer::from_file(&tokenizer_path).map_err(io::Error::other)
}

/// Loads a tokenizer configured for batched (query, passage) pairs.
///
/// Pairs longer than `max_len` lose tokens from the passage side first; shorter
/// pairs are padded to the longest member of the batch.
pub fn load_pair_tokenizer(model_path: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let mut tokenizer = load_tokenizer(model_path)?;

    let truncation = TruncationParams {
        max_length: max_len,
        strategy: TruncationStrategy::OnlySecond,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;
    tokenizer.with_padding(Some(PaddingParams::default()));

    Ok(tokenizer)
}

/// Cuts `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_short_input_unchanged() {
        assert_eq!(truncate_chars("visa", 500), "visa");
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        let text = "ééééé";
        assert_eq!(truncate_chars(text, 3), "ééé");
        assert_eq!(truncate_chars(text, 0), "");
    }

    #[test]
    fn test_load_tokenizer_missing_file() {
        let result = load_tokenizer(Path::new("/nonexistent/model-dir/tokenizer.json"));
        assert!(result.is_err());
    }
}
