use std::any::Any;
use std::fmt;

pub struct BsDebug<'a>(pub &'a [u8]);

fn fmt_b(b: u8, f: &mut fmt::Formatter) -> fmt::Result {
    // ASCII printable
    if b >= 0x20 && b < 0x7f {
        write!(f, "{}", b as char)
    } else {
        write!(f, "\\x{:02x}", b)
    }
}

impl<'a> fmt::Debug for BsDebug<'a> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        if self.0.len() > 20 && self.0.iter().all(|&b| b == self.0[0]) {
            write!(fmt, "{}*b\"", self.0.len())?;
            fmt_b(self.0[0], fmt)?;
            write!(fmt, "\"")?;
            return Ok(());
        }

        write!(fmt, "b\"")?;
        for &c in self.0 {
            fmt_b(c, fmt)?;
        }
        write!(fmt, "\"")?;
        Ok(())
    }
}

/// Decode bytes treating each byte as one character (ISO-8859-1).
pub fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

pub fn any_to_string(any: Box<dyn Any + Send + 'static>) -> String {
    match any.downcast::<String>() {
        Ok(s) => *s,
        Err(any) => match any.downcast::<&str>() {
            Ok(s) => (*s).to_owned(),
            Err(_) => "unknown any".to_owned(),
        },
    }
}
