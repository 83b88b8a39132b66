use anyhow::{Context, Result, bail};

/// Parse a single seed token: decimal, or hexadecimal with a `0x` prefix.
pub fn parse_seed(token: &str) -> Result<u64> {
    let token = token.trim();
    if token.is_empty() {
        bail!("empty seed");
    }
    let hex = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"));
    if let Some(digits) = hex {
        let digits = digits.replace('_', "");
        return u64::from_str_radix(&digits, 16)
            .with_context(|| format!("invalid hexadecimal seed `{token}`"));
    }
    token
        .replace('_', "")
        .parse::<u64>()
        .with_context(|| format!("invalid seed `{token}`"))
}

/// Resolve CLI seed tokens, keeping first-seen order and dropping repeats.
///
/// With no tokens the configured seed is used on its own.
pub fn resolve_seeds(tokens: &[String], fallback: u64) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::with_capacity(tokens.len().max(1));
    for token in tokens {
        let seed = parse_seed(token)?;
        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }
    if seeds.is_empty() {
        seeds.push(fallback);
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!(parse_seed("1944").unwrap(), 1944);
        assert_eq!(parse_seed("0x5EED").unwrap(), 0x5EED);
        assert_eq!(parse_seed("0X_ff").unwrap(), 255);
        assert_eq!(parse_seed("1_000").unwrap(), 1000);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_seed("seed").is_err());
        assert!(parse_seed("0xZZ").is_err());
        assert!(parse_seed("-4").is_err());
        assert!(parse_seed("  ").is_err());
    }

    #[test]
    fn resolves_in_order_without_duplicates() {
        let tokens = vec!["3".to_string(), "0x1".to_string(), "3".to_string()];
        assert_eq!(resolve_seeds(&tokens, 9).unwrap(), vec![3, 1]);
    }

    #[test]
    fn falls_back_to_configured_seed() {
        assert_eq!(resolve_seeds(&[], 42).unwrap(), vec![42]);
    }
}
