// Copyright 2023 NEONFORGE LLC.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end tests driving the `neon` binary against fake neon-cli and
//! Helm executables.

#[cfg(all(test, unix))]
mod tests {
    use std::ffi::OsString;
    use std::fs;
    use std::os::unix::ffi::OsStringExt;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::process::{Command, Output, Stdio};
    use std::thread;
    use std::time::{Duration, Instant};

    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;
    use tempfile::TempDir;

    const FAKE_TOOL: &str = r#"#!/bin/sh
if [ -n "$FAKE_GRANDCHILD" ]; then
    sleep 60 &
    echo $! > "$0.grandchild"
fi
printf '%s\n' "$@" > "$0.args"
if [ -n "$FAKE_SLEEP" ]; then
    sleep "$FAKE_SLEEP"
fi
exit "${FAKE_EXIT_CODE:-0}"
"#;

    /// An install folder holding fake neon-cli and Helm executables that
    /// record their arguments next to themselves.
    struct InstallFolder {
        dir: TempDir,
    }

    impl InstallFolder {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::create_dir(dir.path().join("tools")).unwrap();
            let folder = Self { dir };
            write_script(&folder.neon_cli());
            write_script(&folder.helm());
            folder
        }

        fn empty() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
            }
        }

        fn path(&self) -> &Path {
            self.dir.path()
        }

        fn neon_cli(&self) -> PathBuf {
            self.path().join("neon-cli")
        }

        fn helm(&self) -> PathBuf {
            self.path().join("tools").join("helm")
        }

        fn recorded_args(tool: &Path) -> Option<Vec<String>> {
            let args = fs::read_to_string(tool.with_extension("args")).ok()?;
            Some(args.lines().map(str::to_string).collect())
        }

        fn recorded_bytes(tool: &Path) -> Option<Vec<u8>> {
            fs::read(tool.with_extension("args")).ok()
        }

        fn grandchild(tool: &Path) -> Option<Pid> {
            let pid = fs::read_to_string(tool.with_extension("grandchild")).ok()?;
            pid.trim().parse().ok().map(Pid::from_raw)
        }
    }

    fn write_script(path: &Path) {
        fs::write(path, FAKE_TOOL).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn neon(install: &InstallFolder) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_neon"));
        command
            .env("NEON_INSTALL_FOLDER", install.path())
            .env_remove("NC_ROOT")
            .env_remove("NK_ROOT")
            .env_remove("NEON_LOG")
            .env_remove("FAKE_SLEEP")
            .env_remove("FAKE_EXIT_CODE")
            .env_remove("FAKE_GRANDCHILD")
            .stdin(Stdio::null());
        command
    }

    fn run(command: &mut Command) -> Output {
        command.output().expect("failed to run neon")
    }

    /// Zombies count as gone: nothing may reap them in a container.
    fn is_running(pid: Pid) -> bool {
        if kill(pid, None::<Signal>).is_err() {
            return false;
        }
        match fs::read_to_string(format!("/proc/{}/stat", pid)) {
            Ok(stat) => stat
                .rsplit(')')
                .next()
                .and_then(|rest| rest.split_whitespace().next())
                .is_some_and(|state| state != "Z"),
            Err(_) => !Path::new("/proc/self").exists(),
        }
    }

    #[test]
    fn test_exit_code_is_relayed() {
        let install = InstallFolder::new();

        for code in [0, 3, 42] {
            let output = run(neon(&install)
                .args(["cluster", "health"])
                .env("FAKE_EXIT_CODE", code.to_string()));
            assert_eq!(output.status.code(), Some(code));
        }
    }

    #[test]
    fn test_islocked_exit_codes_pass_through() {
        let install = InstallFolder::new();

        for code in [0, 1, 2] {
            let output = run(neon(&install)
                .args(["cluster", "islocked"])
                .env("FAKE_EXIT_CODE", code.to_string()));
            assert_eq!(output.status.code(), Some(code));
        }
    }

    #[test]
    fn test_neon_cli_receives_ordered_arguments() {
        let install = InstallFolder::new();

        let output = run(neon(&install).args([
            "cluster",
            "deploy",
            "--quiet",
            "my-cluster.yaml",
            "--max-parallel=3",
        ]));
        assert!(output.status.success());

        assert_eq!(
            InstallFolder::recorded_args(&install.neon_cli()).unwrap(),
            vec!["cluster", "deploy", "my-cluster.yaml", "--max-parallel=3", "--quiet"]
        );
    }

    #[test]
    fn test_missing_argument_launches_nothing() {
        let install = InstallFolder::new();

        let output = run(neon(&install).args(["cluster", "validate"]));
        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("CLUSTERDEF"));
        assert!(InstallFolder::recorded_args(&install.neon_cli()).is_none());
    }

    #[test]
    fn test_missing_executable_fails_launch() {
        let install = InstallFolder::empty();

        let output = run(neon(&install).args(["cluster", "health"]));
        // -1 as seen by the parent
        assert_eq!(output.status.code(), Some(255));
        assert!(String::from_utf8_lossy(&output.stderr).contains("*** ERROR:"));
    }

    #[test]
    fn test_helm_arguments_reach_helm_unmodified() {
        let install = InstallFolder::new();
        let args = ["--namespace", "neon-system", "list", "--", "--help", "-a b"];

        let output = run(neon(&install)
            .arg("helm")
            .args(args)
            .env("FAKE_EXIT_CODE", "5"));
        assert_eq!(output.status.code(), Some(5));
        assert_eq!(
            InstallFolder::recorded_args(&install.helm()).unwrap(),
            args.to_vec()
        );
    }

    #[test]
    fn test_helm_non_utf8_argument_is_preserved() {
        let install = InstallFolder::new();
        let arg = OsString::from_vec(b"--set=name=\xff\xfe".to_vec());

        let output = run(neon(&install).arg("helm").arg(&arg));
        assert!(output.status.success());
        assert_eq!(
            InstallFolder::recorded_bytes(&install.helm()).unwrap(),
            b"--set=name=\xff\xfe\n".to_vec()
        );
    }

    fn assert_signal_kills_tool_tree(signal: Signal) {
        let install = InstallFolder::new();

        let mut child = neon(&install)
            .args(["cluster", "health"])
            .env("FAKE_SLEEP", "60")
            .env("FAKE_GRANDCHILD", "1")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();

        // The fake tool records its arguments as soon as it starts
        let deadline = Instant::now() + Duration::from_secs(10);
        while InstallFolder::recorded_args(&install.neon_cli()).is_none() {
            assert!(Instant::now() < deadline, "neon-cli never started");
            thread::sleep(Duration::from_millis(20));
        }

        let grandchild = InstallFolder::grandchild(&install.neon_cli()).unwrap();
        assert!(is_running(grandchild));

        let started = Instant::now();
        kill(Pid::from_raw(child.id() as i32), signal).unwrap();

        let status = loop {
            if let Some(status) = child.try_wait().unwrap() {
                break status;
            }
            if started.elapsed() > Duration::from_secs(10) {
                let _ = child.kill();
                panic!("neon didn't exit after {:?}", signal);
            }
            thread::sleep(Duration::from_millis(20));
        };

        // neon-cli was killed with SIGKILL
        assert_eq!(status.code(), Some(128 + 9));

        let deadline = Instant::now() + Duration::from_secs(5);
        while is_running(grandchild) {
            assert!(Instant::now() < deadline, "grandchild survived {:?}", signal);
            thread::sleep(Duration::from_millis(20));
        }
    }

    #[test]
    fn test_interrupt_kills_child_tree_and_exits() {
        assert_signal_kills_tool_tree(Signal::SIGINT);
    }

    #[test]
    fn test_terminate_kills_child_tree_and_exits() {
        assert_signal_kills_tool_tree(Signal::SIGTERM);
    }

    #[test]
    fn test_version_is_local() {
        let install = InstallFolder::empty();

        let output = run(neon(&install).args(["version", "-o", "json"]));
        assert!(output.status.success());

        let versions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(versions["neonCli"], "0.10.0-beta.4");
        assert_eq!(versions["helm"], "3.12.0");
    }
}
