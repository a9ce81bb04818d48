//! Test fixtures - sample recipes.

#![allow(dead_code)]

/// A flake with anchors for the version and all four platforms.
pub const FLAKE: &str = r#"{
  description = "Zen Browser";

  outputs = { self, nixpkgs }: let
    #:version:
    version = "1.0.0";
    downloads = {
      "x86_64-linux" = {
        url = "https://github.com/zen-browser/desktop/releases/download/${version}/zen.linux-x86_64.tar.xz";
        #:sha256:
        sha256 = "sha256:old-x86_64-linux";
      };
      "aarch64-linux" = {
        url = "https://github.com/zen-browser/desktop/releases/download/${version}/zen.linux-aarch64.tar.xz";
        #:sha256:
        sha256 = "sha256:old-aarch64-linux";
      };
      "aarch64-darwin" = {
        url = "https://github.com/zen-browser/desktop/releases/download/${version}/zen.macos-universal.dmg";
        #:sha256:
        sha256 = "sha256:old-aarch64-darwin";
      };
      "x86_64-darwin" = {
        url = "https://github.com/zen-browser/desktop/releases/download/${version}/zen.macos-universal.dmg";
        #:sha256:
        sha256 = "sha256:old-x86_64-darwin";
      };
    };
  in {};
}
"#;

pub const LINUX_X86_64: &str = "zen.linux-x86_64.tar.xz";
pub const LINUX_AARCH64: &str = "zen.linux-aarch64.tar.xz";
pub const MACOS_UNIVERSAL: &str = "zen.macos-universal.dmg";
