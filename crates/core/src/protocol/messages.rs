use flightmap_common::protocol::{
    ADD_PREFIX, ADD_SEPARATOR, LIST, LOG, LOG_TERMINATOR, NOT_FOUND, QUERY_PREFIX,
};
use flightmap_common::Address;

/// A line sent to the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCommand {
    /// `@`
    List,
    /// `?name`
    Query(String),
    /// `!name:address`, only produced when the whole line is well formed
    Add { name: String, address: Address },
    /// Anything else, including malformed adds
    Unknown(String),
}

impl RegistryCommand {
    /// Classify a line that has already had its newline removed
    pub fn parse(line: &str) -> Self {
        if line == LIST {
            return Self::List;
        }
        if let Some(name) = line.strip_prefix(QUERY_PREFIX) {
            return Self::Query(name.to_string());
        }
        if let Some(body) = line.strip_prefix(ADD_PREFIX) {
            if let Some((name, address)) = parse_add_body(body) {
                return Self::Add { name, address };
            }
        }
        Self::Unknown(line.to_string())
    }

    /// The wire form, without the newline
    pub fn encode(&self) -> String {
        match self {
            Self::List => LIST.to_string(),
            Self::Query(name) => format!("{}{}", QUERY_PREFIX, name),
            Self::Add { name, address } => {
                format!("{}{}{}{}", ADD_PREFIX, name, ADD_SEPARATOR, address)
            }
            Self::Unknown(raw) => raw.clone(),
        }
    }
}

/// `name:address` with exactly one separator, a non-empty name, no control
/// characters and a valid port for the address
fn parse_add_body(body: &str) -> Option<(String, Address)> {
    if body.chars().any(char::is_control) {
        return None;
    }
    if body.matches(ADD_SEPARATOR).count() != 1 {
        return None;
    }

    let (name, address) = body.split_once(ADD_SEPARATOR)?;
    if name.is_empty() || address.is_empty() {
        return None;
    }

    let address = address.parse().ok()?;
    Some((name.to_string(), address))
}

/// A line sent to a service node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeCommand {
    /// `log`
    Log,
    /// Any other line is the visitor's identity
    Visit(String),
}

impl NodeCommand {
    pub fn parse(line: &str) -> Self {
        if line == LOG {
            Self::Log
        } else {
            Self::Visit(line.to_string())
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Log => LOG.to_string(),
            Self::Visit(id) => id.clone(),
        }
    }
}

/// One line of a registry listing
pub fn listing_line(name: &str, address: &Address) -> String {
    format!("{}{}{}", name, ADD_SEPARATOR, address)
}

/// Split a listing line back into its name and address
pub fn parse_listing_line(line: &str) -> Option<(String, Address)> {
    let (name, address) = line.rsplit_once(ADD_SEPARATOR)?;
    Some((name.to_string(), address.parse().ok()?))
}

/// The registry's reply to a query
pub fn query_reply(found: Option<&Address>) -> String {
    match found {
        Some(address) => address.to_string(),
        None => NOT_FOUND.to_string(),
    }
}

/// Interpret a query reply; `None` means the registry has no mapping
pub fn parse_query_reply(line: &str) -> Option<Address> {
    if line == NOT_FOUND {
        return None;
    }
    line.parse().ok()
}

pub fn is_log_terminator(line: &str) -> bool {
    line == LOG_TERMINATOR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(name: &str, address: &str) -> RegistryCommand {
        RegistryCommand::Add {
            name: name.to_string(),
            address: address.parse().unwrap(),
        }
    }

    #[test]
    fn test_parse_registry_commands() {
        assert_eq!(RegistryCommand::parse("@"), RegistryCommand::List);
        assert_eq!(
            RegistryCommand::parse("?BNE"),
            RegistryCommand::Query("BNE".to_string())
        );
        assert_eq!(RegistryCommand::parse("?"), RegistryCommand::Query(String::new()));
        assert_eq!(RegistryCommand::parse("!BNE:4000"), add("BNE", "4000"));
        assert_eq!(RegistryCommand::parse("!a:1"), add("a", "1"));
    }

    #[test]
    fn test_list_must_be_exact() {
        assert!(matches!(RegistryCommand::parse("@@"), RegistryCommand::Unknown(_)));
        assert!(matches!(RegistryCommand::parse(" @"), RegistryCommand::Unknown(_)));
    }

    #[test]
    fn test_malformed_adds_are_unknown() {
        for line in [
            "!",
            "!BNE",
            "!:4000",
            "!BNE:",
            "!BNE:4000:1",
            "!B:N:4000",
            "!BNE:0",
            "!BNE:65536",
            "!BNE:port",
            "!BNE:4000\r",
            "!BN\tE:4000",
        ] {
            assert!(
                matches!(RegistryCommand::parse(line), RegistryCommand::Unknown(_)),
                "{line:?} should not parse as an add"
            );
        }
    }

    #[test]
    fn test_add_keeps_address_text() {
        let command = RegistryCommand::parse("!SYD:0080");
        assert_eq!(command.encode(), "!SYD:0080");
    }

    #[test]
    fn test_node_commands() {
        assert_eq!(NodeCommand::parse("log"), NodeCommand::Log);
        assert_eq!(
            NodeCommand::parse("logs"),
            NodeCommand::Visit("logs".to_string())
        );
        assert_eq!(NodeCommand::parse(""), NodeCommand::Visit(String::new()));
        assert_eq!(NodeCommand::Visit("QF1".to_string()).encode(), "QF1");
    }

    #[test]
    fn test_query_reply() {
        let address: Address = "4000".parse().unwrap();
        assert_eq!(query_reply(Some(&address)), "4000");
        assert_eq!(query_reply(None), ";");
        assert_eq!(parse_query_reply(";"), None);
        assert_eq!(parse_query_reply("4000"), Some(address));
    }

    #[test]
    fn test_listing_line() {
        let address: Address = "4000".parse().unwrap();
        let line = listing_line("BNE", &address);
        assert_eq!(line, "BNE:4000");
        assert_eq!(
            parse_listing_line(&line),
            Some(("BNE".to_string(), address))
        );
    }
}
