//! Matric number construction.
//!
//! A matric number is a deterministic prefix (admission year digits, the
//! department code, and an HND tag for that track) joined to a random
//! four-digit suffix, e.g. `24/CS/1234` or `24/ACC/HND/5821`. The suffix is
//! drawn uniformly from [1000, 9999]; uniqueness comes from the caller
//! checking candidates against stored numbers and retrying, not from the
//! draw itself.

use rand::Rng;

use crate::models::enums::Program;

/// Retries before a candidate search gives up. 9000 possible suffixes per
/// prefix, so exhaustion at this bound means the space is nearly full.
pub const MAX_GENERATION_ATTEMPTS: usize = 25;

/// Deterministic portion of a matric number for a department intake.
///
/// `session` is a label like "2024/2025"; the first year's last two digits
/// become the leading segment.
pub fn matric_prefix(session: &str, dept_code: &str, program: Program) -> String {
    let year_digits: String = session
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let short_year = if year_digits.len() >= 2 {
        &year_digits[year_digits.len() - 2..]
    } else {
        &year_digits
    };

    match program {
        Program::ND => format!("{short_year}/{dept_code}"),
        Program::HND => format!("{short_year}/{dept_code}/HND"),
    }
}

/// One candidate: prefix plus a fresh random suffix.
pub fn matric_candidate<R: Rng>(prefix: &str, rng: &mut R) -> String {
    let suffix: u32 = rng.gen_range(1000..=9999);
    format!("{prefix}/{suffix}")
}

/// Draw candidates until one passes `is_taken == false`, up to
/// [`MAX_GENERATION_ATTEMPTS`]. Returns `None` when every draw collided.
///
/// The collision check is a closure so the storage lookup stays out of this
/// function; tests drive it with an in-memory set.
pub fn generate_unique<R, F>(prefix: &str, rng: &mut R, mut is_taken: F) -> Option<String>
where
    R: Rng,
    F: FnMut(&str) -> bool,
{
    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let candidate = matric_candidate(prefix, rng);
        if !is_taken(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_prefix_format() {
        assert_eq!(matric_prefix("2024/2025", "CS", Program::ND), "24/CS");
        assert_eq!(
            matric_prefix("2024/2025", "ACC", Program::HND),
            "24/ACC/HND"
        );
        assert_eq!(matric_prefix("2020/2021", "CS", Program::ND), "20/CS");
    }

    #[test]
    fn test_candidate_suffix_range() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let candidate = matric_candidate("24/CS", &mut rng);
            let suffix: u32 = candidate.rsplit('/').next().unwrap().parse().unwrap();
            assert!((1000..=9999).contains(&suffix), "suffix {suffix} out of range");
        }
    }

    #[test]
    fn test_retry_skips_taken_candidates() {
        let mut rng = rand::thread_rng();
        // Mark everything taken except one suffix; retries must find it
        // eventually across repeated runs, and must never return a taken one.
        let mut taken: HashSet<String> = (1000..=9999)
            .filter(|n| *n != 5555)
            .map(|n| format!("24/CS/{n}"))
            .collect();

        let mut found_free = false;
        for _ in 0..5000 {
            if let Some(candidate) = generate_unique("24/CS", &mut rng, |c| taken.contains(c)) {
                assert_eq!(candidate, "24/CS/5555");
                found_free = true;
                break;
            }
        }
        assert!(found_free, "bounded retry never found the free suffix");

        taken.insert("24/CS/5555".to_string());
        assert_eq!(
            generate_unique("24/CS", &mut rng, |c| taken.contains(c)),
            None
        );
    }

    /// Retry-on-collision never hands out a duplicate. 10,000 numbers across
    /// several department prefixes, each draw checked against everything
    /// issued so far.
    #[test]
    fn test_no_duplicates_across_ten_thousand_generations() {
        let mut rng = rand::thread_rng();
        let prefixes: Vec<String> = ["CS", "ACC", "EEE", "MTH", "BUS"]
            .iter()
            .flat_map(|code| {
                [
                    matric_prefix("2024/2025", code, Program::ND),
                    matric_prefix("2024/2025", code, Program::HND),
                ]
            })
            .collect();

        let mut issued: HashSet<String> = HashSet::new();
        for i in 0..10_000 {
            let prefix = &prefixes[i % prefixes.len()];
            let number = generate_unique(prefix, &mut rng, |c| issued.contains(c))
                .unwrap_or_else(|| panic!("generation {i} exhausted retries"));
            assert!(issued.insert(number), "duplicate matric number issued");
        }
        assert_eq!(issued.len(), 10_000);
    }
}
