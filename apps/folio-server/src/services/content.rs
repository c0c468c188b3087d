//! Content server seam.
//!
//! The daemon does not serve publication content itself; a collaborator does
//! (historically an HTTP streamer). The container binds this trait object so
//! downstream services can form resource URLs without caring who answers
//! them.

pub trait ContentServer: Send + Sync {
    /// Base URL under which publication resources are exposed.
    fn base_url(&self) -> String;

    /// URL of a whole publication's manifest.
    fn publication_url(&self, publication_id: &str) -> String {
        format!("{}/pub/{publication_id}/manifest.json", self.base_url())
    }
}

/// Default content server: loopback address, fixed port. Stands in until a
/// real streamer is attached by the host application.
pub struct LoopbackContentServer {
    port: u16,
}

impl LoopbackContentServer {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

impl Default for LoopbackContentServer {
    fn default() -> Self {
        Self::new(9876)
    }
}

impl ContentServer for LoopbackContentServer {
    fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publication_urls_hang_off_the_base() {
        let server = LoopbackContentServer::new(4000);
        assert_eq!(server.base_url(), "http://127.0.0.1:4000");
        assert_eq!(
            server.publication_url("pub-1"),
            "http://127.0.0.1:4000/pub/pub-1/manifest.json"
        );
    }
}
