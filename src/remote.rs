//! Remote host conventions and command composition.
//!
//! Every name, port, and path on the droplet is fixed by convention rather
//! than configurable per run. The functions here compose the remote command
//! strings the workflows send through `docker-machine ssh`; compound
//! operations join sub-commands with `&&` so a failing sub-command
//! short-circuits the remainder on the remote shell.

use crate::shell::quote_arg;

/// Provisioning driver passed to `docker-machine create`.
pub const DRIVER: &str = "digitalocean";
/// Fixed droplet tier.
pub const SERVER_SIZE: &str = "s-1vcpu-1gb";
/// Where to create a write-enabled API token.
pub const TOKEN_URL: &str = "https://cloud.digitalocean.com/settings/api/tokens/new";

/// Bridge network joining the app and database containers.
pub const NETWORK: &str = "oceanup-net";
/// Image tag built from the project's Dockerfile.
pub const IMAGE: &str = "oceanup-app";
/// App container name.
pub const WEB_CONTAINER: &str = "oceanup-web";
/// Database container name.
pub const DB_CONTAINER: &str = "oceanup-db";
/// Clone target, relative to the remote user's home directory.
pub const PROJECT_DIR: &str = "webproject";
/// Absolute path of the clone, mounted into the app container.
pub const PROJECT_MOUNT: &str = "/root/webproject";
/// Host directory backing the database volume.
pub const DB_VOLUME: &str = "/root/db_volume";
/// Port the app listens on inside its container.
pub const APP_PORT: u16 = 3000;
/// Host port when TLS is skipped and the app is published directly.
pub const HOST_PORT: u16 = 80;
/// Where the proxy configuration lands on the droplet.
pub const CADDYFILE_PATH: &str = "/etc/caddy/Caddyfile";

/// Container topology started by provisioning: the app and its database.
/// `docker ps` on a set-up host shows exactly this many rows below the header.
pub const EXPECTED_CONTAINERS: usize = 2;

const DB_USER: &str = "admin";
const DB_PASSWORD: &str = "password";

/// Database name, keyed by the environment name.
#[must_use]
pub fn database_name(environment: &str) -> String {
    format!("oceanup_{environment}")
}

fn database_url(environment: &str) -> String {
    format!(
        "postgres://{DB_USER}:{DB_PASSWORD}@{DB_CONTAINER}:5432/{}?sslmode=disable",
        database_name(environment)
    )
}

/// Allocate, format, and enable a 2 GB swapfile in one joined command.
#[must_use]
pub fn swap_setup_command() -> String {
    [
        "dd if=/dev/zero of=/swapfile bs=2k count=1024k",
        "mkswap /swapfile",
        "chmod 600 /swapfile",
        "swapon /swapfile",
    ]
    .join(" && ")
}

/// Persist the swapfile across reboots.
#[must_use]
pub fn swap_persist_command() -> &'static str {
    "bash -c \"echo '/swapfile       none    swap    sw      0       0' >> /etc/fstab\""
}

/// Generate an RSA-4096 deploy key with an empty passphrase.
/// `app_name` is validated at config construction, so it is safe to embed.
#[must_use]
pub fn keygen_command(app_name: &str) -> String {
    format!("bash -c \"echo | ssh-keygen -q -N '' -t rsa -b 4096 -C 'deploy@{app_name}'\"")
}

/// Print the public half of the deploy key for manual registration.
pub const SHOW_DEPLOY_KEY: &str = "tail .ssh/id_rsa.pub";

/// Pre-seed the droplet's known-hosts entry for the source host.
pub const SEED_KNOWN_HOSTS: &str = "ssh-keyscan github.com >> ~/.ssh/known_hosts";

/// Install git on the droplet before cloning.
pub const INSTALL_GIT: &str = "apt-get install -y git";

/// Clone the repository with non-interactive host-key acceptance,
/// qualified by the configured branch or tag.
#[must_use]
pub fn clone_command(repo_url: &str, clone_ref: &str) -> String {
    format!(
        "yes yes | git clone --branch {} {} {PROJECT_DIR}",
        quote_arg(clone_ref),
        quote_arg(repo_url)
    )
}

/// Create the bridge network.
#[must_use]
pub fn network_create_command() -> String {
    format!("docker network create --driver bridge {NETWORK}")
}

/// Build the app image from the cloned project's Dockerfile.
#[must_use]
pub fn build_image_command() -> String {
    format!("docker build -t {IMAGE} -f {PROJECT_DIR}/Dockerfile {PROJECT_DIR}")
}

/// Start the database container with the fixed credential conventions,
/// backed by a host-local persistent directory.
#[must_use]
pub fn db_run_command(environment: &str) -> String {
    format!(
        "docker container run --name {DB_CONTAINER} \
         -v {DB_VOLUME}:/var/lib/postgresql/data \
         --network={NETWORK} \
         -e POSTGRES_USER={DB_USER} \
         -e POSTGRES_PASSWORD={DB_PASSWORD} \
         -e POSTGRES_DB={} \
         -d postgres",
        database_name(environment)
    )
}

/// Start the app container.
///
/// The publish flag depends on the TLS decision: direct on port 80 when TLS
/// is skipped, loopback-only on the internal port otherwise. `--env-file`
/// appears only when an env file was captured and uploaded.
#[must_use]
pub fn web_run_command(environment: &str, skip_ssl: bool, with_env_file: bool) -> String {
    let publish = if skip_ssl {
        format!("-p {HOST_PORT}:{APP_PORT}")
    } else {
        format!("-p 127.0.0.1:{APP_PORT}:{APP_PORT}")
    };
    let env_file = if with_env_file {
        format!(" --env-file {PROJECT_DIR}/.env")
    } else {
        String::new()
    };
    format!(
        "docker container run --name {WEB_CONTAINER} \
         -v {PROJECT_MOUNT}:/app \
         {publish} \
         --network={NETWORK} \
         -e APP_ENV={environment} \
         -e DATABASE_URL={}{env_file} \
         -d {IMAGE}",
        database_url(environment)
    )
}

/// Pull the latest source and check out the configured ref.
#[must_use]
pub fn update_command(checkout_ref: &str) -> String {
    format!(
        "bash -c \"cd {PROJECT_DIR} && git pull && git checkout {}\"",
        quote_arg(checkout_ref)
    )
}

/// Commands run in order to replace the running app container.
#[must_use]
pub fn redeploy_commands(environment: &str, skip_ssl: bool) -> Vec<String> {
    vec![
        format!("docker container stop {WEB_CONTAINER}"),
        format!("docker container rm {WEB_CONTAINER}"),
        build_image_command(),
        web_run_command(environment, skip_ssl, false),
    ]
}

/// Create the proxy configuration directory ahead of the upload.
pub const PREPARE_PROXY_DIR: &str = "mkdir -p /etc/caddy";

/// Reverse-proxy configuration binding the domain to the app's loopback
/// port, with automatic certificate management against the given contact.
#[must_use]
pub fn caddyfile(domain: &str, email: &str) -> String {
    format!(
        "{domain} {{\n    tls {email}\n\n    proxy / 127.0.0.1:{APP_PORT} {{\n        transparent\n        websocket\n    }}\n}}\n"
    )
}

/// Fetch the proxy binary, fix directory ownership, install the system
/// service, and start it — one joined sequence.
#[must_use]
pub fn proxy_install_command() -> String {
    [
        "curl -fsSL https://getcaddy.com | bash -s personal",
        "mkdir -p /etc/ssl/caddy",
        "chown -R root:www-data /etc/caddy",
        "chown -R www-data:root /etc/ssl/caddy",
        "chmod 0770 /etc/ssl/caddy",
        "curl -fsSL -o /etc/systemd/system/caddy.service https://raw.githubusercontent.com/caddyserver/caddy/master/dist/init/linux-systemd/caddy.service",
        "systemctl daemon-reload",
        "systemctl enable caddy",
        "systemctl start caddy",
    ]
    .join(" && ")
}
