// Transport seam.
//
// The SOAP call itself (`handleRequest` on the PAINT service) lives outside
// this workspace. Everything here talks to it through `Transport`, which
// receives already-encoded wire records and returns the raw reply.

use std::future::Future;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::TransportError;
use crate::wire::{RawReply, WireRecord};

/// A remote procedure call into the PAINT service.
pub trait Transport: Send + Sync {
    /// Issue one `handleRequest` call.
    ///
    /// `context` is `None` only for the login call. `bean_key` is the
    /// composite `<beanType>_<beanClass>` key; `None` records are sent as
    /// the SOAP null value.
    fn invoke(
        &self,
        context: Option<&str>,
        bean_key: &str,
        process: &str,
        entity: Option<WireRecord>,
        process_fields: Option<WireRecord>,
    ) -> impl Future<Output = Result<RawReply, TransportError>> + Send;
}

/// PAINT service descriptor a transport should bind to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    RpcEncodedBranded,
    RpcLiteralBranded,
    RpcEncodedUnbranded,
    #[default]
    RpcLiteralUnbranded,
    /// Any other WSDL location (e.g. a staging host).
    Custom(Url),
}

impl Endpoint {
    /// The WSDL URL for this endpoint.
    pub fn wsdl_url(&self) -> Result<Url, url::ParseError> {
        let raw = match self {
            Self::RpcEncodedBranded => "http://paint.pure360.com/paint.pure360.com/ctrlPaint.wsdl",
            Self::RpcLiteralBranded => {
                "http://paint.pure360.com/paint.pure360.com/ctrlPaintLiteral.wsdl"
            }
            Self::RpcEncodedUnbranded => "http://emailapi.co.uk/emailapi.co.uk/ctrlPaint.wsdl",
            Self::RpcLiteralUnbranded => {
                "http://emailapi.co.uk/emailapi.co.uk/ctrlPaintLiteral.wsdl"
            }
            Self::Custom(url) => return Ok(url.clone()),
        };
        Url::parse(raw)
    }
}

/// Accepts the kebab-case endpoint names or an absolute URL.
impl FromStr for Endpoint {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rpc-encoded-branded" => Ok(Self::RpcEncodedBranded),
            "rpc-literal-branded" => Ok(Self::RpcLiteralBranded),
            "rpc-encoded-unbranded" => Ok(Self::RpcEncodedUnbranded),
            "rpc-literal-unbranded" => Ok(Self::RpcLiteralUnbranded),
            other => Url::parse(other).map(Self::Custom),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_is_literal_unbranded() {
        let url = Endpoint::default().wsdl_url().unwrap();
        assert_eq!(
            url.as_str(),
            "http://emailapi.co.uk/emailapi.co.uk/ctrlPaintLiteral.wsdl"
        );
    }

    #[test]
    fn endpoint_from_name_or_url() {
        assert_eq!(
            "rpc-encoded-branded".parse::<Endpoint>().unwrap(),
            Endpoint::RpcEncodedBranded
        );
        let custom: Endpoint = "https://staging.example.com/paint.wsdl".parse().unwrap();
        assert_eq!(
            custom.wsdl_url().unwrap().host_str(),
            Some("staging.example.com")
        );
        assert!("not an endpoint".parse::<Endpoint>().is_err());
    }
}
