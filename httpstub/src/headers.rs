//! Ordered header multimap and the raw header text parser.

use std::fmt;
use std::iter::FromIterator;
use std::slice;

/// All values of one header name, in the order they were added.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub values: Vec<String>,
}

/// Ordered mapping from header name to the list of its values.
///
/// Names are compared exactly (the case of the first occurrence is kept),
/// repeated names accumulate values in insertion order and nothing is
/// merged or deduplicated.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct Headers {
    headers: Vec<Header>,
}

impl Headers {
    /// Empty headers.
    pub fn new() -> Headers {
        Default::default()
    }

    /// Parse a raw header block made of `Name: value` lines.
    ///
    /// Lines are separated by any run of `\r`/`\n`. Lines without a colon
    /// are skipped. The first colon separates name from value, so colons
    /// inside a value are kept. Name and value are trimmed.
    ///
    /// ```
    /// let headers = httpstub::Headers::parse("Location: http://x:1/\nbroken\nA: 1\r\nA: 2");
    /// assert_eq!(Some("http://x:1/"), headers.get("Location"));
    /// assert_eq!(&["1".to_owned(), "2".to_owned()][..], headers.get_all("A"));
    /// assert_eq!(2, headers.len());
    /// ```
    pub fn parse(raw: &str) -> Headers {
        let mut headers = Headers::new();
        for line in raw.split(|c| c == '\r' || c == '\n') {
            if let Some((name, value)) = line.split_once(':') {
                headers.add(name.trim(), value.trim());
            }
        }
        headers
    }

    /// Build headers from `(name, values)` pairs, e. g. from a map.
    pub fn from_multimap<I, N, V>(iter: I) -> Headers
    where
        I: IntoIterator<Item = (N, Vec<V>)>,
        N: Into<String>,
        V: Into<String>,
    {
        let mut headers = Headers::new();
        for (name, values) in iter {
            let name = name.into();
            for value in values {
                headers.add(name.clone(), value);
            }
        }
        headers
    }

    /// Append a value to the list of values of the header.
    pub fn add<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        let name = name.into();
        let value = value.into();
        match self.headers.iter_mut().find(|h| h.name == name) {
            Some(header) => header.values.push(value),
            None => self.headers.push(Header {
                name,
                values: vec![value],
            }),
        }
    }

    /// Builder-style [`add`](Headers::add).
    pub fn with<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Headers {
        self.add(name, value);
        self
    }

    /// All values of the header, empty if there is no such header.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| &h.values[..])
            .unwrap_or(&[])
    }

    /// First value of the header.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(|v| v.as_str())
    }

    /// First value of the header, header name compared ASCII-case-insensitively.
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .filter(|h| h.name.eq_ignore_ascii_case(name))
            .flat_map(|h| h.values.first())
            .map(|v| v.as_str())
            .next()
    }

    /// Iterate over all `name: values` groups in insertion order.
    pub fn iter(&self) -> slice::Iter<Header> {
        self.headers.iter()
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        for (i, value) in self.values.iter().enumerate() {
            if i != 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", value.trim())?;
        }
        Ok(())
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, header) in self.headers.iter().enumerate() {
            if i != 0 {
                writeln!(f)?;
            }
            fmt::Display::fmt(header, f)?;
        }
        Ok(())
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Headers {
        let mut headers = Headers::new();
        headers.extend(iter);
        headers
    }
}

impl<N: Into<String>, V: Into<String>> Extend<(N, V)> for Headers {
    fn extend<I: IntoIterator<Item = (N, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.add(name, value);
        }
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a Header;
    type IntoIter = slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
