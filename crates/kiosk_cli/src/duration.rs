use std::str::FromStr;
use std::time::Duration;

/// `1h15m30s`-style durations for command-line flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

impl HumanDuration {
    fn unit_seconds(unit: char) -> Result<u64, String> {
        match unit {
            's' => Ok(1),
            'm' => Ok(60),
            'h' => Ok(3600),
            'd' => Ok(86_400),
            other => Err(format!("Invalid duration unit: {}", other)),
        }
    }
}

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let overflow = || format!("Duration too large: {}", s);
        let mut total: u64 = 0;
        let mut digits = String::new();
        let mut saw_number = false;

        // `None` marks the end; a trailing bare number counts as seconds.
        let chars = s.chars().filter(|c| !c.is_whitespace()).map(Some);
        for c in chars.chain(Some(None)) {
            match c {
                Some(d) if d.is_ascii_digit() => {
                    digits.push(d);
                    continue;
                }
                Some(c) if digits.is_empty() => {
                    return Err(format!("Invalid character in duration: {}", c));
                }
                None if digits.is_empty() => break,
                _ => {}
            }
            let unit = match c {
                Some(unit) => Self::unit_seconds(unit)?,
                None => 1,
            };
            let count: u64 = digits.parse().map_err(|_| overflow())?;
            let seconds = count
                .checked_mul(unit)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(overflow)?;
            total = seconds;
            digits.clear();
            saw_number = true;
        }

        if !saw_number {
            return Err("Duration must include a number".to_string());
        }
        if total == 0 {
            return Err("Duration must be greater than zero".to_string());
        }
        Ok(HumanDuration(Duration::from_secs(total)))
    }
}
