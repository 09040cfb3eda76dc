//! STOMP 1.2 text frame codec for the realtime chat transport.
//!
//! This crate owns the wire representation used by the chat client: command
//! parsing, header escaping, `content-length` handling, and the NUL frame
//! terminator. Bodies stay opaque strings (JSON is the caller's concern).

/// Error returned by [`decode_frame`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The command line does not name a known STOMP command.
    #[error("unknown STOMP command: {0}")]
    UnknownCommand(String),
    /// A header line has no `name:value` separator.
    #[error("malformed header line: {0}")]
    MalformedHeader(String),
    /// A header value contains an undefined backslash escape.
    #[error("invalid header escape sequence: \\{0}")]
    InvalidEscape(char),
    /// The `content-length` header is not a usable byte count.
    #[error("invalid content-length header: {0}")]
    BadContentLength(String),
    /// The frame body is not terminated by a NUL octet.
    #[error("frame is missing its NUL terminator")]
    MissingTerminator,
    /// The input holds no frame at all (empty or heartbeat-only).
    #[error("empty frame")]
    Empty,
}

/// STOMP commands the chat client sends or receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Connect,
    Connected,
    Subscribe,
    Unsubscribe,
    Send,
    Message,
    Receipt,
    Error,
    Disconnect,
}

impl Command {
    /// Wire spelling of the command.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Connected => "CONNECTED",
            Self::Subscribe => "SUBSCRIBE",
            Self::Unsubscribe => "UNSUBSCRIBE",
            Self::Send => "SEND",
            Self::Message => "MESSAGE",
            Self::Receipt => "RECEIPT",
            Self::Error => "ERROR",
            Self::Disconnect => "DISCONNECT",
        }
    }

    fn parse(value: &str) -> Result<Self, CodecError> {
        match value {
            "CONNECT" => Ok(Self::Connect),
            "CONNECTED" => Ok(Self::Connected),
            "SUBSCRIBE" => Ok(Self::Subscribe),
            "UNSUBSCRIBE" => Ok(Self::Unsubscribe),
            "SEND" => Ok(Self::Send),
            "MESSAGE" => Ok(Self::Message),
            "RECEIPT" => Ok(Self::Receipt),
            "ERROR" => Ok(Self::Error),
            "DISCONNECT" => Ok(Self::Disconnect),
            other => Err(CodecError::UnknownCommand(other.to_owned())),
        }
    }

    /// Header escaping applies to every frame except CONNECT/CONNECTED,
    /// which the STOMP 1.2 spec exempts for 1.0 compatibility.
    fn escapes_headers(self) -> bool {
        !matches!(self, Self::Connect | Self::Connected)
    }
}

/// A single STOMP frame: command, ordered headers, and an opaque body.
///
/// Repeated header names are preserved in order; [`Frame::header`] returns
/// the first occurrence, matching the spec's precedence rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Frame {
    /// First value recorded for `name`, if any.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// CONNECT frame carrying the session bearer token.
    #[must_use]
    pub fn connect(bearer_token: &str) -> Self {
        Self {
            command: Command::Connect,
            headers: vec![
                ("accept-version".to_owned(), "1.2".to_owned()),
                ("host".to_owned(), "/".to_owned()),
                ("heart-beat".to_owned(), "0,0".to_owned()),
                (
                    "Authorization".to_owned(),
                    format!("Bearer {bearer_token}"),
                ),
            ],
            body: String::new(),
        }
    }

    /// SUBSCRIBE frame for a broadcast destination.
    #[must_use]
    pub fn subscribe(id: &str, destination: &str) -> Self {
        Self {
            command: Command::Subscribe,
            headers: vec![
                ("id".to_owned(), id.to_owned()),
                ("destination".to_owned(), destination.to_owned()),
                ("ack".to_owned(), "auto".to_owned()),
            ],
            body: String::new(),
        }
    }

    /// UNSUBSCRIBE frame matching a prior subscription id.
    #[must_use]
    pub fn unsubscribe(id: &str) -> Self {
        Self {
            command: Command::Unsubscribe,
            headers: vec![("id".to_owned(), id.to_owned())],
            body: String::new(),
        }
    }

    /// SEND frame with a JSON body.
    #[must_use]
    pub fn send_json(destination: &str, body: String) -> Self {
        Self {
            command: Command::Send,
            headers: vec![
                ("destination".to_owned(), destination.to_owned()),
                ("content-type".to_owned(), "application/json".to_owned()),
            ],
            body,
        }
    }

    /// DISCONNECT frame ending the session.
    #[must_use]
    pub fn disconnect() -> Self {
        Self {
            command: Command::Disconnect,
            headers: Vec::new(),
            body: String::new(),
        }
    }
}

/// True when the input is only EOLs, which is a STOMP heartbeat rather than a frame.
#[must_use]
pub fn is_heartbeat(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b == b'\n' || b == b'\r')
}

/// Encode a frame into its wire text, including the NUL terminator.
///
/// A `content-length` header is written whenever the body is non-empty so
/// receivers never have to guess at embedded NULs.
#[must_use]
pub fn encode_frame(frame: &Frame) -> String {
    let escape = frame.command.escapes_headers();
    let mut out = String::with_capacity(frame.body.len() + 64);
    out.push_str(frame.command.as_str());
    out.push('\n');

    for (name, value) in &frame.headers {
        if escape {
            out.push_str(&escape_header(name));
            out.push(':');
            out.push_str(&escape_header(value));
        } else {
            out.push_str(name);
            out.push(':');
            out.push_str(value);
        }
        out.push('\n');
    }
    if !frame.body.is_empty() {
        out.push_str("content-length:");
        out.push_str(&frame.body.len().to_string());
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&frame.body);
    out.push('\0');
    out
}

/// Decode one frame from its wire text.
///
/// # Errors
///
/// Returns [`CodecError::Empty`] for empty or heartbeat-only input, and the
/// matching variant for an unknown command, malformed header, bad escape,
/// unusable `content-length`, or missing NUL terminator.
pub fn decode_frame(raw: &str) -> Result<Frame, CodecError> {
    let raw = raw.trim_start_matches(['\r', '\n']);
    if raw.is_empty() {
        return Err(CodecError::Empty);
    }

    // The blank line ending the headers may use either EOL form.
    let (head_end, sep_len) = match (raw.find("\n\n"), raw.find("\n\r\n")) {
        (Some(lf), Some(crlf)) if crlf < lf => (crlf, 3),
        (Some(lf), _) => (lf, 2),
        (None, Some(crlf)) => (crlf, 3),
        (None, None) => return Err(CodecError::MissingTerminator),
    };
    let head = &raw[..head_end];
    let rest = &raw[head_end + sep_len..];

    let mut lines = head.lines();
    let command_line = lines.next().ok_or(CodecError::Empty)?;
    let command = Command::parse(command_line.trim_end_matches('\r'))?;
    let unescape_headers = command.escapes_headers();

    let mut headers = Vec::new();
    for line in lines {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| CodecError::MalformedHeader(line.to_owned()))?;
        if unescape_headers {
            headers.push((unescape_header(name)?, unescape_header(value)?));
        } else {
            headers.push((name.to_owned(), value.to_owned()));
        }
    }

    let body = read_body(rest, &headers)?;
    Ok(Frame {
        command,
        headers,
        body,
    })
}

fn read_body(rest: &str, headers: &[(String, String)]) -> Result<String, CodecError> {
    let declared = headers
        .iter()
        .find(|(n, _)| n == "content-length")
        .map(|(_, v)| v.as_str());

    if let Some(value) = declared {
        let len: usize = value
            .parse()
            .map_err(|_| CodecError::BadContentLength(value.to_owned()))?;
        let body = rest
            .get(..len)
            .ok_or_else(|| CodecError::BadContentLength(value.to_owned()))?;
        if !rest[len..].starts_with('\0') {
            return Err(CodecError::MissingTerminator);
        }
        return Ok(body.to_owned());
    }

    let end = rest.find('\0').ok_or(CodecError::MissingTerminator)?;
    Ok(rest[..end].to_owned())
}

fn escape_header(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            ':' => out.push_str("\\c"),
            other => out.push(other),
        }
    }
    out
}

fn unescape_header(value: &str) -> Result<String, CodecError> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('c') => out.push(':'),
            Some(other) => return Err(CodecError::InvalidEscape(other)),
            None => return Err(CodecError::InvalidEscape('\0')),
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
