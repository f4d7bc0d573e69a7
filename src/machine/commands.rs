use std::path::PathBuf;

use super::{DB_CONTAINER, ImageTags, MYSQL_IMAGE, NAME_PREFIX, WORDPRESS_IMAGE, WP_CONTAINER};

/// Container path of the MySQL data directory.
const MYSQL_DATA_DIR: &str = "/var/lib/mysql";
/// Container path of the WordPress document root.
const WORDPRESS_ROOT: &str = "/var/www/html";

/// Fully resolved inputs for the two `run` commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartArgs {
    pub tags: ImageTags,
    pub env_file: PathBuf,
    pub http_port: u16,
    pub database_path: Option<PathBuf>,
    pub wordpress_path: Option<PathBuf>,
    /// Flat `-v host:container` pairs, one per theme.
    pub theme_volumes: Vec<String>,
}

/// Names of running stack containers: `container ls --format {{.Names}} --filter name=wapcon-`.
pub fn list_containers_args() -> Vec<String> {
    vec![
        "container".into(),
        "ls".into(),
        "--format".into(),
        "{{.Names}}".into(),
        "--filter".into(),
        format!("name={NAME_PREFIX}"),
    ]
}

/// Local images as `repository:tag` lines.
pub fn list_images_args() -> Vec<String> {
    vec![
        "image".into(),
        "ls".into(),
        "--format".into(),
        "{{.Repository}}:{{.Tag}}".into(),
    ]
}

/// Detached, auto-removed MySQL container.
pub fn start_db_args(args: &StartArgs) -> Vec<String> {
    let mut cmd = vec![
        "run".into(),
        "-d".into(),
        "--rm".into(),
        "--name".into(),
        DB_CONTAINER.into(),
        "--env-file".into(),
        args.env_file.display().to_string(),
    ];
    if let Some(path) = &args.database_path {
        cmd.push("-v".into());
        cmd.push(format!("{}:{MYSQL_DATA_DIR}", path.display()));
    }
    cmd.push(format!("{MYSQL_IMAGE}:{}", args.tags.mysql));
    cmd
}

/// Detached, auto-removed WordPress container linked to the database.
pub fn start_wp_args(args: &StartArgs) -> Vec<String> {
    let mut cmd = vec![
        "run".into(),
        "-d".into(),
        "--rm".into(),
        "--name".into(),
        WP_CONTAINER.into(),
        "--link".into(),
        format!("{DB_CONTAINER}:db"),
        "--env-file".into(),
        args.env_file.display().to_string(),
        "-p".into(),
        format!("{}:80", args.http_port),
    ];
    if let Some(path) = &args.wordpress_path {
        cmd.push("-v".into());
        cmd.push(format!("{}:{WORDPRESS_ROOT}", path.display()));
    }
    cmd.extend(args.theme_volumes.iter().cloned());
    cmd.push(format!("{WORDPRESS_IMAGE}:{}", args.tags.wordpress));
    cmd
}

pub fn stop_args(container: &str) -> Vec<String> {
    vec!["stop".into(), container.into()]
}

pub fn remove_images_args(tags: &ImageTags) -> Vec<String> {
    vec![
        "image".into(),
        "rm".into(),
        format!("{WORDPRESS_IMAGE}:{}", tags.wordpress),
        format!("{MYSQL_IMAGE}:{}", tags.mysql),
    ]
}

/// Container mount point of a theme directory.
pub fn theme_mount_point(theme_id: &str) -> String {
    format!("{WORDPRESS_ROOT}/wp-content/themes/{NAME_PREFIX}{theme_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_args() -> StartArgs {
        StartArgs {
            tags: ImageTags::default(),
            env_file: PathBuf::from("./machine-env"),
            http_port: 80,
            database_path: None,
            wordpress_path: None,
            theme_volumes: Vec::new(),
        }
    }

    #[test]
    fn list_containers_filters_by_prefix() {
        let args = list_containers_args();
        assert_eq!(args[..2], ["container", "ls"]);
        assert!(args.contains(&"{{.Names}}".into()));
        assert!(args.contains(&"name=wapcon-".into()));
    }

    #[test]
    fn start_db_builds_correct_args() {
        let args = start_db_args(&test_args());
        assert_eq!(
            args,
            vec![
                "run",
                "-d",
                "--rm",
                "--name",
                "wapcon-db",
                "--env-file",
                "./machine-env",
                "mysql:latest"
            ]
        );
    }

    #[test]
    fn start_db_mounts_data_dir() {
        let mut cfg = test_args();
        cfg.database_path = Some(PathBuf::from("/srv/db"));
        let args = start_db_args(&cfg);
        assert!(args.contains(&"/srv/db:/var/lib/mysql".into()));
        assert_eq!(args.last().map(String::as_str), Some("mysql:latest"));
    }

    #[test]
    fn start_wp_links_db_and_maps_port() {
        let mut cfg = test_args();
        cfg.http_port = 8080;
        cfg.tags.wordpress = "6.4".into();
        let args = start_wp_args(&cfg);
        assert!(args.contains(&"wapcon-wp".into()));
        assert!(args.contains(&"--link".into()));
        assert!(args.contains(&"wapcon-db:db".into()));
        assert!(args.contains(&"8080:80".into()));
        assert_eq!(args.last().map(String::as_str), Some("wordpress:6.4"));
    }

    #[test]
    fn start_wp_places_theme_volumes_before_image() {
        let mut cfg = test_args();
        cfg.wordpress_path = Some(PathBuf::from("/srv/wp"));
        cfg.theme_volumes = vec![
            "-v".into(),
            "/home/foo/theme:/var/www/html/wp-content/themes/wapcon-123".into(),
        ];
        let args = start_wp_args(&cfg);
        let n = args.len();
        assert_eq!(args[n - 5..n - 3], ["-v", "/srv/wp:/var/www/html"]);
        assert_eq!(
            args[n - 3..n - 1],
            ["-v", "/home/foo/theme:/var/www/html/wp-content/themes/wapcon-123"]
        );
    }

    #[test]
    fn remove_images_lists_both() {
        let tags = ImageTags {
            wordpress: "latest".into(),
            mysql: "8.0".into(),
        };
        assert_eq!(
            remove_images_args(&tags),
            vec!["image", "rm", "wordpress:latest", "mysql:8.0"]
        );
    }

    #[test]
    fn theme_mount_point_uses_prefix() {
        assert_eq!(
            theme_mount_point("123"),
            "/var/www/html/wp-content/themes/wapcon-123"
        );
    }
}
