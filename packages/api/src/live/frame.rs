//! STOMP 1.2 text frames.
//!
//! A frame is `COMMAND\n`, zero or more `name:value\n` headers, a blank line,
//! the body and a NUL byte. A websocket message may carry several frames, or
//! only the `\n` heart-beats the broker sends between them.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("frame is missing its command line")]
    MissingCommand,
    #[error("malformed header line `{0}`")]
    BadHeader(String),
    #[error("invalid escape sequence in header")]
    BadEscape,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Connect,
    Connected,
    Subscribe,
    Unsubscribe,
    Disconnect,
    Message,
    Receipt,
    Error,
    Other(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        match line {
            "CONNECT" | "STOMP" => Self::Connect,
            "CONNECTED" => Self::Connected,
            "SUBSCRIBE" => Self::Subscribe,
            "UNSUBSCRIBE" => Self::Unsubscribe,
            "DISCONNECT" => Self::Disconnect,
            "MESSAGE" => Self::Message,
            "RECEIPT" => Self::Receipt,
            "ERROR" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Connect => "CONNECT",
            Self::Connected => "CONNECTED",
            Self::Subscribe => "SUBSCRIBE",
            Self::Unsubscribe => "UNSUBSCRIBE",
            Self::Disconnect => "DISCONNECT",
            Self::Message => "MESSAGE",
            Self::Receipt => "RECEIPT",
            Self::Error => "ERROR",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub command: Command,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Frame {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// First value of `name`; STOMP says repeated headers keep the first.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn connect(host: &str, token: Option<&str>) -> Self {
        let frame = Self::new(Command::Connect)
            .header("accept-version", "1.2")
            .header("host", host)
            .header("heart-beat", "0,0");
        match token {
            Some(token) => frame.header("Authorization", format!("Bearer {token}")),
            None => frame,
        }
    }

    pub fn subscribe(id: &str, destination: &str) -> Self {
        Self::new(Command::Subscribe)
            .header("id", id)
            .header("destination", destination)
            .header("ack", "auto")
    }

    pub fn disconnect() -> Self {
        Self::new(Command::Disconnect)
    }

    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(64 + self.body.len());
        out.push_str(self.command.as_str());
        out.push('\n');
        // CONNECT and CONNECTED headers are never escaped.
        let escape = !matches!(self.command, Command::Connect | Command::Connected);
        for (name, value) in &self.headers {
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
        if !self.body.is_empty() {
            out.push_str(&format!("content-length:{}\n", self.body.len()));
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push('\0');
        out
    }

    /// Parse every frame in one websocket message. Heart-beats yield nothing.
    pub fn parse_all(raw: &str) -> Result<Vec<Frame>, FrameError> {
        let mut frames = Vec::new();
        for chunk in raw.split('\0') {
            let chunk = chunk.trim_start_matches(['\r', '\n']);
            if chunk.is_empty() {
                continue;
            }
            frames.push(Self::parse_one(chunk)?);
        }
        Ok(frames)
    }

    fn parse_one(chunk: &str) -> Result<Frame, FrameError> {
        let (head, body) = match chunk.find("\n\n") {
            Some(i) => (&chunk[..i], &chunk[i + 2..]),
            None => match chunk.find("\r\n\r\n") {
                Some(i) => (&chunk[..i], &chunk[i + 4..]),
                None => (chunk, ""),
            },
        };
        let mut lines = head.lines();
        let command = lines
            .next()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or(FrameError::MissingCommand)?;
        let command = Command::parse(command);
        let unescape = !matches!(command, Command::Connect | Command::Connected);

        let mut headers = Vec::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| FrameError::BadHeader(line.to_string()))?;
            if unescape {
                headers.push((unescape_header(name)?, unescape_header(value)?));
            } else {
                headers.push((name.to_string(), value.to_string()));
            }
        }
        Ok(Frame {
            command,
            headers,
            body: body.to_string(),
        })
    }
}

fn escape_header(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ':' => out.push_str("\\c"),
            c => out.push(c),
        }
    }
    out
}

fn unescape_header(s: &str) -> Result<String, FrameError> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('c') => out.push(':'),
            _ => return Err(FrameError::BadEscape),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_frame_carries_bearer_token() {
        let encoded = Frame::connect("helpdesk.local", Some("tok")).encode();
        assert_eq!(
            encoded,
            "CONNECT\naccept-version:1.2\nhost:helpdesk.local\nheart-beat:0,0\nAuthorization:Bearer tok\n\n\0"
        );
    }

    #[test]
    fn test_subscribe_frame() {
        let encoded = Frame::subscribe("sub-0", "/topic/dashboard-counts").encode();
        assert!(encoded.starts_with("SUBSCRIBE\nid:sub-0\ndestination:/topic/dashboard-counts\nack:auto\n"));
        assert!(encoded.ends_with("\n\n\0"));
    }

    #[test]
    fn test_parse_message_with_body() {
        let raw = "MESSAGE\ndestination:/topic/dashboard-counts\nsubscription:sub-0\n\n{\"open\":4}\0\n";
        let frames = Frame::parse_all(raw).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].command, Command::Message);
        assert_eq!(frames[0].get("subscription"), Some("sub-0"));
        assert_eq!(frames[0].body, "{\"open\":4}");
    }

    #[test]
    fn test_heartbeats_yield_no_frames() {
        assert!(Frame::parse_all("\n").unwrap().is_empty());
        assert!(Frame::parse_all("\r\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_several_frames_in_one_message() {
        let raw = "CONNECTED\nversion:1.2\n\n\0\nMESSAGE\ndestination:/t\n\n{}\0";
        let frames = Frame::parse_all(raw).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].command, Command::Connected);
        assert_eq!(frames[1].body, "{}");
    }

    #[test]
    fn test_header_escaping() {
        let frame = Frame::new(Command::Message).header("note", "a:b\nc");
        let parsed = Frame::parse_all(&frame.encode()).unwrap();
        assert_eq!(parsed[0].get("note"), Some("a:b\nc"));

        assert_eq!(
            Frame::parse_all("MESSAGE\nbad:\\x\n\n\0"),
            Err(FrameError::BadEscape)
        );
        assert!(matches!(
            Frame::parse_all("MESSAGE\nno-colon\n\n\0"),
            Err(FrameError::BadHeader(_))
        ));
    }
}
