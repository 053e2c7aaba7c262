//! Interactive prompts
//!
//! Every menu answer is parsed into a closed enum at this boundary. An answer that
//! does not parse re-asks the same question; `q` at the key-filter menu, or end of
//! input anywhere, ends the session.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use super::errors::CliResult;
use crate::executor::SortSpec;
use crate::filter::{KeyConstraint, KeyRange};
use crate::pipeline::QueryRequest;
use crate::schema::Schema;

/// Which key fields the user wants to constrain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFilterMode {
    None,
    Partition,
    Sort,
    Both,
    Quit,
}

impl KeyFilterMode {
    pub fn filters_partition(&self) -> bool {
        matches!(self, KeyFilterMode::Partition | KeyFilterMode::Both)
    }

    pub fn filters_sort(&self) -> bool {
        matches!(self, KeyFilterMode::Sort | KeyFilterMode::Both)
    }
}

impl FromStr for KeyFilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "none" => Ok(KeyFilterMode::None),
            "p" | "partition" => Ok(KeyFilterMode::Partition),
            "s" | "r" | "sort" | "row" => Ok(KeyFilterMode::Sort),
            "b" | "both" => Ok(KeyFilterMode::Both),
            "q" | "quit" => Ok(KeyFilterMode::Quit),
            other => Err(invalid(other)),
        }
    }
}

/// Exact value or range for one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintMode {
    Exact,
    Range,
}

impl FromStr for ConstraintMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "i" | "e" | "individual" | "exact" => Ok(ConstraintMode::Exact),
            "r" | "range" => Ok(ConstraintMode::Range),
            other => Err(invalid(other)),
        }
    }
}

/// Which bounds a range has
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMode {
    Lower,
    Upper,
    Both,
}

impl RangeMode {
    pub fn has_lower(&self) -> bool {
        matches!(self, RangeMode::Lower | RangeMode::Both)
    }

    pub fn has_upper(&self) -> bool {
        matches!(self, RangeMode::Upper | RangeMode::Both)
    }
}

impl FromStr for RangeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "lower" => Ok(RangeMode::Lower),
            "u" | "upper" => Ok(RangeMode::Upper),
            "b" | "both" => Ok(RangeMode::Both),
            other => Err(invalid(other)),
        }
    }
}

/// Which field the results are ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortChoice {
    None,
    Partition,
    Sort,
    Other,
}

impl FromStr for SortChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "n" | "none" => Ok(SortChoice::None),
            "p" | "primary" | "partition" => Ok(SortChoice::Partition),
            "s" | "secondary" | "sort" => Ok(SortChoice::Sort),
            "o" | "other" => Ok(SortChoice::Other),
            other => Err(invalid(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

impl FromStr for YesNo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Ok(YesNo::Yes),
            "n" | "no" => Ok(YesNo::No),
            other => Err(invalid(other)),
        }
    }
}

fn invalid(answer: &str) -> String {
    format!("'{}' is not one of the listed options", answer)
}

/// Parses `field [asc|desc]`
fn parse_sort_attribute(answer: &str) -> Result<SortSpec, String> {
    let mut parts = answer.split_whitespace();
    let field = parts
        .next()
        .ok_or_else(|| "an attribute name is required".to_string())?;
    let spec = match parts.next().map(str::to_ascii_lowercase).as_deref() {
        None | Some("asc") => SortSpec::asc(field),
        Some("desc") => SortSpec::desc(field),
        Some(other) => return Err(format!("unknown direction '{}'", other)),
    };
    match parts.next() {
        Some(extra) => Err(format!("unexpected '{}' after direction", extra)),
        None => Ok(spec),
    }
}

/// Line-oriented question and answer over any reader and writer
pub struct Prompter<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes a line to the session output
    pub fn say(&mut self, text: impl fmt::Display) -> CliResult<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Asks once. `None` at end of input.
    pub fn line(&mut self, prompt: &str) -> CliResult<Option<String>> {
        write!(self.output, "{} ", prompt)?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(None);
        }
        Ok(Some(answer.trim().to_string()))
    }

    /// Asks until the answer parses. `None` at end of input.
    pub fn choice<T>(&mut self, prompt: &str) -> CliResult<Option<T>>
    where
        T: FromStr<Err = String>,
    {
        loop {
            let answer = match self.line(prompt)? {
                Some(a) => a,
                None => return Ok(None),
            };
            match answer.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(reason) => self.say(format!("Please enter a valid option: {}.", reason))?,
            }
        }
    }

    /// Collects one full request. `None` when the user quits.
    pub fn collect_request(&mut self, schema: &Schema) -> CliResult<Option<QueryRequest>> {
        let pk = schema.partition_key.name.clone();
        let sk = schema.sort_key.name.clone();
        let mut request = QueryRequest::default();

        let mode = match self.choice::<KeyFilterMode>(&format!(
            "Filter by key? [(n)one/(p)artition key '{}'/(s)ort key '{}'/(b)oth/(q)uit] >",
            pk, sk
        ))? {
            Some(KeyFilterMode::Quit) | None => return Ok(None),
            Some(mode) => mode,
        };

        if mode.filters_partition() {
            request.partition = match self.key_constraint(&format!("partition key '{}'", pk))? {
                Some(c) => c,
                None => return Ok(None),
            };
        }
        if mode.filters_sort() {
            request.sort_key = match self.key_constraint(&format!("sort key '{}'", sk))? {
                Some(c) => c,
                None => return Ok(None),
            };
        }

        request.filter = match self.line("Filters (e.g. rating gt 7.5 and genres eq 'Drama') >")? {
            Some(f) => f,
            None => return Ok(None),
        };

        request.sort = match self.choice::<SortChoice>(
            "Sort [(n)one/(p)artition key/(s)ort key/(o)ther attribute] >",
        )? {
            None => return Ok(None),
            Some(SortChoice::None) => None,
            Some(SortChoice::Partition) => Some(SortSpec::asc(pk)),
            Some(SortChoice::Sort) => Some(SortSpec::asc(sk)),
            Some(SortChoice::Other) => {
                match self.parsed("Attribute to sort by [asc|desc] >", parse_sort_attribute)? {
                    Some(spec) => Some(spec),
                    None => return Ok(None),
                }
            }
        };

        request.display = match self.line("Fields to display, comma separated (blank for all) >")? {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
                .collect(),
            None => return Ok(None),
        };

        request.export = match self.choice::<YesNo>("Export the results to CSV? [y/n] >")? {
            Some(answer) => answer == YesNo::Yes,
            None => return Ok(None),
        };

        Ok(Some(request))
    }

    fn key_constraint(&mut self, label: &str) -> CliResult<Option<KeyConstraint>> {
        let mode = match self.choice::<ConstraintMode>(&format!(
            "Constrain {} by [(i)ndividual value/(r)ange] >",
            label
        ))? {
            Some(m) => m,
            None => return Ok(None),
        };

        if mode == ConstraintMode::Exact {
            let value = self.line(&format!("Individual value for {} >", label))?;
            return Ok(value.map(KeyConstraint::Exact));
        }

        let range_mode = match self.choice::<RangeMode>(&format!(
            "Range for {} [(l)ower bound/(u)pper bound/(b)oth] >",
            label
        ))? {
            Some(m) => m,
            None => return Ok(None),
        };

        let mut range = KeyRange::default();
        if range_mode.has_lower() {
            range.lower = match self.line(&format!("Lower bound for {} (exclusive) >", label))? {
                Some(v) => Some(v),
                None => return Ok(None),
            };
        }
        if range_mode.has_upper() {
            range.upper = match self.line(&format!("Upper bound for {} (exclusive) >", label))? {
                Some(v) => Some(v),
                None => return Ok(None),
            };
        }
        Ok(Some(KeyConstraint::Range(range)))
    }

    /// Asks until `parse` accepts the answer. `None` at end of input.
    fn parsed<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> CliResult<Option<T>> {
        loop {
            let answer = match self.line(prompt)? {
                Some(a) => a,
                None => return Ok(None),
            };
            match parse(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(reason) => self.say(format!("Please enter a valid option: {}.", reason))?,
            }
        }
    }
}
