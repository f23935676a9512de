//! Prints an authorization URL for scopes given on the command line.
//!
//! `cargo run --example authorization_url -- identify email identify`

// crates.io
use color_eyre::Result;
// self
use esc_oauth::{client::ReqwestEscClient, config::ClientConfig};

fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::builder()
		.client_id("demo-client")
		.client_secret("demo-secret")
		.redirect_uri("http://127.0.0.1:3000/callback")
		.api_url("https://api.esc.example")
		.oauth_url("https://esc.example")
		.build()?;
	let client = ReqwestEscClient::new(config);
	let scopes = std::env::args().skip(1).collect::<Vec<_>>();
	let url = if scopes.is_empty() {
		client.default_authorization_url()
	} else {
		client.build_authorization_url(scopes)
	};

	println!("{url}");

	Ok(())
}
