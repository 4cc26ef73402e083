pub mod server;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        provider_url: String,
        provider_anon_key: String,
        provider_service_key: Option<String>,
        frontend_base_url: String,
        otp_flow_ttl_seconds: u64,
    },
}
