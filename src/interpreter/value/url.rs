use std::{fmt, str::FromStr};

/// The scheme every remote address starts with.
pub const SCHEME: &str = "tcp://";

/// A remote object address: `tcp://host:port/object`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlValue {
    pub host:   String,
    pub port:   u16,
    pub object: String,
}

/// Why a text is not a url.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlError {
    /// The text does not follow `tcp://host:port/object`.
    Malformed,
    /// The port does not fit in 16 bits.
    PortOutOfRange,
}

impl FromStr for UrlValue {
    type Err = UrlError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let rest = text.strip_prefix(SCHEME).ok_or(UrlError::Malformed)?;
        let (authority, object) = rest.split_once('/').ok_or(UrlError::Malformed)?;
        let (host, port) = authority.rsplit_once(':').ok_or(UrlError::Malformed)?;

        let host_ok = !host.is_empty()
                      && host.chars()
                             .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        let port_ok = !port.is_empty() && port.chars().all(|c| c.is_ascii_digit());
        let object_ok = !object.is_empty()
                        && object.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !(host_ok && port_ok && object_ok) {
            return Err(UrlError::Malformed);
        }

        let port = port.parse::<u16>().map_err(|_| UrlError::PortOutOfRange)?;
        Ok(Self { host: host.to_string(),
                  port,
                  object: object.to_string() })
    }
}

impl fmt::Display for UrlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}:{}/{}", self.host, self.port, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_port_and_object() {
        let url: UrlValue = "tcp://localhost:9090/adder".parse().unwrap();
        assert_eq!(url.host, "localhost");
        assert_eq!(url.port, 9090);
        assert_eq!(url.object, "adder");
        assert_eq!(url.to_string(), "tcp://localhost:9090/adder");
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!("http://localhost:1/a".parse::<UrlValue>(), Err(UrlError::Malformed));
        assert_eq!("tcp://localhost/a".parse::<UrlValue>(), Err(UrlError::Malformed));
        assert_eq!("tcp://localhost:12/".parse::<UrlValue>(), Err(UrlError::Malformed));
        assert_eq!("tcp://localhost:70000/a".parse::<UrlValue>(), Err(UrlError::PortOutOfRange));
    }
}
