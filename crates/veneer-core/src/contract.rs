//! Contract descriptions and proxyability checks
//!
//! A [`ContractDescriptor`] is the runtime picture of the surface a proxy
//! stands in for: the contract's name, its shape, and the methods it
//! declares. The engine only fronts interface-shaped contracts; shape is
//! checked once, at build time, and the answer never changes for a given
//! descriptor.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ProxyError, ProxyResult};

/// The shape of a contract, as seen by the proxy engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractShape {
    /// A pure behavioral surface: named methods, no state of its own
    Interface,
    /// A concrete type with its own state and construction
    Concrete,
    /// A plain value with no methods to stand in for
    Scalar,
}

impl fmt::Display for ContractShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractShape::Interface => write!(f, "interface"),
            ContractShape::Concrete => write!(f, "concrete type"),
            ContractShape::Scalar => write!(f, "scalar"),
        }
    }
}

/// A single method declared by a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Method name, unique within the contract
    pub name: String,
    /// Parameter names, in declaration order
    pub params: Vec<String>,
}

impl MethodDescriptor {
    /// Create a new method descriptor
    pub fn new(name: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Number of parameters the method declares
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Runtime description of the contract a proxy satisfies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDescriptor {
    /// Contract name, used in errors and log lines
    pub name: String,
    /// Shape of the contract
    pub shape: ContractShape,
    /// Methods the contract declares
    pub methods: Vec<MethodDescriptor>,
}

impl ContractDescriptor {
    /// Create a new contract descriptor with no methods
    pub fn new(name: impl Into<String>, shape: ContractShape) -> Self {
        Self {
            name: name.into(),
            shape,
            methods: Vec::new(),
        }
    }

    /// Add a method to the contract
    pub fn with_method(mut self, name: impl Into<String>, params: &[&str]) -> Self {
        self.methods.push(MethodDescriptor::new(
            name,
            params.iter().map(|p| p.to_string()).collect(),
        ));
        self
    }

    /// Look up a declared method by name
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Whether the contract declares the given method
    pub fn declares(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    /// Check that this contract can be fronted by a proxy
    ///
    /// Only interface-shaped contracts pass. The check is pure: a
    /// descriptor that fails once fails the same way every time.
    pub fn ensure_proxyable(&self) -> ProxyResult<()> {
        match self.shape {
            ContractShape::Interface => {}
            ContractShape::Concrete => {
                return Err(ProxyError::unsupported_contract(
                    &self.name,
                    "concrete types cannot be transparently fronted, only interfaces",
                ));
            }
            ContractShape::Scalar => {
                return Err(ProxyError::unsupported_contract(
                    &self.name,
                    "scalars declare no methods to front",
                ));
            }
        }

        for (index, method) in self.methods.iter().enumerate() {
            if method.name.is_empty() {
                return Err(ProxyError::unsupported_contract(
                    &self.name,
                    format!("method at position {index} has an empty name"),
                ));
            }
            if self.methods[..index].iter().any(|m| m.name == method.name) {
                return Err(ProxyError::unsupported_contract(
                    &self.name,
                    format!("method '{}' is declared more than once", method.name),
                ));
            }
        }

        Ok(())
    }
}

impl fmt::Display for ContractDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' ({} methods)",
            self.shape,
            self.name,
            self.methods.len()
        )
    }
}

/// Fully qualified method identity: contract name plus method name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodId {
    /// Name of the contract declaring the method
    pub contract: String,
    /// Name of the method
    pub method: String,
}

impl MethodId {
    /// Create a new method identity
    pub fn new(contract: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.contract, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greeter() -> ContractDescriptor {
        ContractDescriptor::new("Greeter", ContractShape::Interface)
            .with_method("say_hello", &["name"])
            .with_method("ping", &[])
    }

    #[test]
    fn test_interface_contract_is_proxyable() {
        assert!(greeter().ensure_proxyable().is_ok());
    }

    #[test]
    fn test_concrete_contract_is_rejected() {
        let contract = ContractDescriptor::new("GreeterImpl", ContractShape::Concrete);
        let err = contract.ensure_proxyable().unwrap_err();
        assert!(matches!(err, ProxyError::UnsupportedContract { .. }));

        // Pure check: asking again yields the identical answer.
        assert_eq!(contract.ensure_proxyable().unwrap_err(), err);
    }

    #[test]
    fn test_scalar_contract_is_rejected() {
        let contract = ContractDescriptor::new("u64", ContractShape::Scalar);
        let err = contract.ensure_proxyable().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("u64"));
        assert!(message.contains("cannot be proxied"));
    }

    #[test]
    fn test_duplicate_method_is_rejected() {
        let contract = ContractDescriptor::new("Greeter", ContractShape::Interface)
            .with_method("say_hello", &["name"])
            .with_method("say_hello", &["name"]);
        let err = contract.ensure_proxyable().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_empty_method_name_is_rejected() {
        let contract =
            ContractDescriptor::new("Greeter", ContractShape::Interface).with_method("", &[]);
        assert!(contract.ensure_proxyable().is_err());
    }

    #[test]
    fn test_method_lookup() {
        let contract = greeter();
        assert!(contract.declares("say_hello"));
        assert!(!contract.declares("wave"));

        let method = contract.method("say_hello").unwrap();
        assert_eq!(method.arity(), 1);
        assert_eq!(method.params, vec!["name".to_string()]);

        let ping = contract.method("ping").unwrap();
        assert_eq!(ping.arity(), 0);
    }

    #[test]
    fn test_contract_display() {
        assert_eq!(greeter().to_string(), "interface 'Greeter' (2 methods)");
    }

    #[test]
    fn test_method_id_display() {
        let id = MethodId::new("Greeter", "say_hello");
        assert_eq!(id.to_string(), "Greeter::say_hello");
    }

    #[test]
    fn test_contract_serialization() {
        let contract = greeter();
        let json = serde_json::to_string(&contract).unwrap();
        let back: ContractDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, contract);
        assert!(json.contains("\"interface\""));
    }
}
