// src/constants.rs

/// Version-controlled defaults file, at the tool root.
pub const DEFAULTS_ENV_FILENAME: &str = ".env.tric";

/// Machine-specific overrides, not version controlled.
pub const LOCAL_ENV_FILENAME: &str = ".env.tric.local";

/// Session state written by the tool itself (current target, XDebug toggles).
pub const RUN_ENV_FILENAME: &str = ".env.tric.run";

/// The docker-compose file describing the stack, at the tool root.
pub const STACK_FILENAME: &str = "tric-stack.yml";

/// The tool's internal `dev` directory, relative overrides resolve from here.
pub const DEV_DIR: &str = "dev";

/// Default plugins directory, relative to the tool root.
pub const DEFAULT_PLUGINS_SUBPATH: &str = "dev/_plugins";

/// Default WordPress directory, relative to the tool root.
pub const DEFAULT_WP_SUBPATH: &str = "dev/_wordpress";

/// Name of the companion sub-target inside a plugin.
pub const COMPANION_DIR: &str = "common";

/// GitHub handle plugins are cloned from when none is configured.
pub const DEFAULT_GITHUB_COMPANY_HANDLE: &str = "moderntribe";

/// The compose binary used as backend.
pub const COMPOSE_PROGRAM: &str = "docker-compose";

/// Service run by `up` when none is given.
pub const DEFAULT_UP_SERVICE: &str = "wordpress";

/// Stack PHP services and their pretty names, in restart order.
pub const PHP_SERVICES: &[(&str, &str)] = &[("wordpress", "WordPress"), ("codeception", "Codeception")];

// --- Recognised configuration keys ---

pub const KEY_ROOT: &str = "TRIC_ROOT";
pub const KEY_CURRENT_PROJECT: &str = "TRIC_CURRENT_PROJECT";
pub const KEY_PLUGINS_DIR: &str = "TRIC_PLUGINS_DIR";
pub const KEY_WP_DIR: &str = "TRIC_WP_DIR";
pub const KEY_GITHUB_COMPANY_HANDLE: &str = "TRIC_GITHUB_COMPANY_HANDLE";
pub const KEY_TEST_SUBNET: &str = "TRIC_TEST_SUBNET";
pub const KEY_CLI_VERBOSITY: &str = "CLI_VERBOSITY";
pub const KEY_MYSQL_ROOT_PASSWORD: &str = "MYSQL_ROOT_PASSWORD";
pub const KEY_WORDPRESS_HTTP_PORT: &str = "WORDPRESS_HTTP_PORT";
pub const KEY_XDEBUG_ENABLED: &str = "XDE";
pub const KEY_XDEBUG_HOST: &str = "XDH";
pub const KEY_XDEBUG_IDE_KEY: &str = "XDK";
pub const KEY_XDEBUG_PORT: &str = "XDP";
pub const KEY_RUN_UID: &str = "DOCKER_RUN_UID";
pub const KEY_RUN_GID: &str = "DOCKER_RUN_GID";

/// Keys displayed by `info`, in display order.
pub const INFO_KEYS: &[&str] = &[
    KEY_TEST_SUBNET,
    KEY_CLI_VERBOSITY,
    KEY_CURRENT_PROJECT,
    KEY_GITHUB_COMPANY_HANDLE,
    KEY_PLUGINS_DIR,
    KEY_XDEBUG_IDE_KEY,
    KEY_XDEBUG_ENABLED,
    KEY_XDEBUG_HOST,
    KEY_XDEBUG_PORT,
    KEY_MYSQL_ROOT_PASSWORD,
    KEY_WORDPRESS_HTTP_PORT,
];
