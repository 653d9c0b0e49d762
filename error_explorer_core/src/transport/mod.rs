/*!
 * How we deliver: the HTTP transport seam and the retrying delivery client.
 */

mod delivery;
mod http;

pub use delivery::DeliveryClient;
pub use http::{HttpTransport, Transport, TransportError};
