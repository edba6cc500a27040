//! Service and RPC descriptors.

use serde::{Deserialize, Serialize};

use crate::{Doc, OptionValue, ServiceName, TypeName};

/// An RPC method declared in a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rpc {
    /// Method name as declared.
    pub name: String,
    /// Request message type.
    pub request_type: TypeName,
    /// Response message type.
    pub response_type: TypeName,
    /// `true` when the client streams requests.
    pub client_streaming: bool,
    /// `true` when the server streams responses.
    pub server_streaming: bool,
    /// Options declared on the method, in declaration order.
    pub options: Vec<OptionValue>,
    /// Documentation attached to the method.
    pub doc: Doc,
}

/// A service declared in a proto file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Name of the service.
    pub name: ServiceName,
    /// RPC methods in declaration order.
    pub rpcs: Vec<Rpc>,
    /// Options declared on the service, in declaration order.
    pub options: Vec<OptionValue>,
    /// Documentation attached to the service.
    pub doc: Doc,
}

impl Service {
    /// Look up a declared RPC method by name.
    pub fn rpc(&self, name: &str) -> Option<&Rpc> { self.rpcs.iter().find(|r| r.name == name) }
}
