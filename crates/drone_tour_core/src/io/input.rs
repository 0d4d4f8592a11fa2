use std::{fs, io::Read, str::FromStr};

use drone_tour_derive::KvDisplay;

use crate::{Error, Result, SolverOptions, site::Site};

/// Sites to solve over, in input order. Site 0 is the tour origin.
#[derive(Clone, Debug, KvDisplay)]
pub struct SolverInput {
    #[kv(name = "n", fmt = "len")]
    pub(crate) sites: Vec<Site>,
}

impl SolverInput {
    pub fn new(sites: &[Site]) -> Self {
        Self {
            sites: sites.to_vec(),
        }
    }

    /// Reads from `--input` when set, stdin otherwise.
    pub fn from_options(options: &SolverOptions) -> Result<Self> {
        let text = match options.input_path() {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::invalid_input(format!("cannot read {}: {e}", path.display()))
            })?,
            None => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                text
            }
        };
        Ok(Self {
            sites: parse_sites(&text)?,
        })
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn n(&self) -> usize {
        self.sites.len()
    }
}

/// Parses `N` followed by `N` integer coordinate pairs, any whitespace between.
pub(crate) fn parse_sites(input: &str) -> Result<Vec<Site>> {
    let mut tokens = input.split_whitespace().enumerate();

    let (_, count_tok) = tokens
        .next()
        .ok_or_else(|| Error::invalid_input("No sites provided."))?;
    let count: usize = parse_token(0, count_tok, "site count")?;
    if count == 0 {
        return Err(Error::invalid_input("No sites provided."));
    }

    // The count is untrusted; reserve no more than the text could hold.
    let mut sites = Vec::with_capacity(count.min(input.len() / 2));
    for idx in 0..count {
        let x = next_coordinate(&mut tokens, idx, count, "x")?;
        let y = next_coordinate(&mut tokens, idx, count, "y")?;
        sites.push(Site::new(x, y));
    }

    let trailing = tokens.count();
    if trailing > 0 {
        log::warn!("input: ignoring trailing tokens count={trailing}");
    }
    log::debug!("input: parsed sites={}", sites.len());
    Ok(sites)
}

fn next_coordinate<'a>(
    tokens: &mut impl Iterator<Item = (usize, &'a str)>,
    site: usize,
    count: usize,
    axis: &str,
) -> Result<i32> {
    let (pos, tok) = tokens.next().ok_or_else(|| {
        Error::invalid_input(format!(
            "Site {site}: missing {axis} coordinate (expected {count} sites)"
        ))
    })?;
    parse_token(pos, tok, &format!("{axis} coordinate of site {site}"))
}

fn parse_token<T: FromStr>(pos: usize, tok: &str, what: &str) -> Result<T> {
    tok.parse().map_err(|_| {
        Error::invalid_input(format!("Token {}: invalid {what}: {tok}", pos + 1))
    })
}

#[cfg(test)]
mod tests {
    use super::{SolverInput, parse_sites};
    use crate::site::{Region, Site};

    #[test]
    fn parses_count_then_coordinate_pairs() {
        let sites = parse_sites("3\n0 0\n-4 -2\n  7\t9\n").expect("parse sites");
        assert_eq!(sites, vec![Site::new(0, 0), Site::new(-4, -2), Site::new(7, 9)]);
        assert_eq!(sites[1].region(), Region::Restricted);
    }

    #[test]
    fn line_layout_does_not_matter() {
        let sites = parse_sites("2 1 2 3 4").expect("parse sites");
        assert_eq!(sites, vec![Site::new(1, 2), Site::new(3, 4)]);
    }

    #[test]
    fn trailing_tokens_are_ignored() {
        let sites = parse_sites("1\n5 5\n6 6\n").expect("parse sites");
        assert_eq!(sites, vec![Site::new(5, 5)]);
    }

    #[test]
    fn empty_or_zero_count_is_rejected() {
        for text in ["", " \n\t", "0"] {
            let err = parse_sites(text).expect_err("no sites");
            assert!(err.to_string().contains("No sites provided."), "{text:?}");
        }
    }

    #[test]
    fn short_input_names_the_missing_coordinate() {
        let err = parse_sites("3\n0 0\n1").expect_err("short input");
        assert!(err.to_string().contains("Site 1: missing y coordinate"));
    }

    #[test]
    fn huge_count_without_coordinates_is_an_error() {
        let err = parse_sites("4000000000000000000 1 2").expect_err("huge count");
        assert!(err.to_string().contains("Site 1: missing x coordinate"));

        let err = parse_sites(&usize::MAX.to_string()).expect_err("max count");
        assert!(err.to_string().contains("Site 0: missing x coordinate"));
    }

    #[test]
    fn non_integer_tokens_are_rejected_with_position() {
        let err = parse_sites("2\n0 0\n1.5 2").expect_err("float");
        assert!(err.to_string().contains("Token 4: invalid x coordinate of site 1: 1.5"));

        let err = parse_sites("-3\n").expect_err("negative count");
        assert!(err.to_string().contains("invalid site count"));
    }

    #[test]
    fn display_reports_site_count() {
        let input = SolverInput::new(&[Site::new(0, 0), Site::new(1, 1)]);
        assert_eq!(input.to_string(), "n=2");
        assert_eq!(input.n(), 2);
    }
}
