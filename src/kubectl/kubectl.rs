use std::fmt;
use std::path::PathBuf;

use tokio::process::Command;
use tracing::info;

// snapshot file names, kept compatible with the shell scripts that seed a
// replay directory by hand
const NODE_SNAPSHOT: &str = "k8s-node-description.txt";
const POD_SNAPSHOT: &str = "k8s-pod-info.txt";

// emits "namespace,podname,nodename,gpucount" for every Running pod that
// requests nvidia.com/gpu
const POD_GPU_TEMPLATE: &str = concat!(
    r#"{{range .items}}{{if (eq .status.phase "Running")}}{{$pns:=.metadata.namespace}}"#,
    r#"{{$pname:=.metadata.name}}{{$pnode:=.spec.nodeName}}{{range .spec.containers}}"#,
    r#"{{ with .resources.requests }}{{$gpus:=(index . "nvidia.com/gpu")}}"#,
    r#"{{if $gpus}}{{$pns}}{{","}}{{$pname}}{{","}}{{$pnode}}{{","}}{{$gpus}}{{"\n"}}"#,
    r#"{{end}}{{end}}{{end}}{{end}}{{end}}"#,
);

#[derive(Debug)]
pub enum Error {
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    CommandIo(std::io::Error),
    Snapshot(std::io::Error),
    BadOutput(std::string::FromUtf8Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CommandFailed {
                command,
                code,
                stderr,
            } => {
                let code = code.map_or("none".to_string(), |c| c.to_string());
                write!(
                    f,
                    "could not execute command \"{}\": exit code: {}, error: {}",
                    command, code, stderr
                )
            }
            Error::CommandIo(e) => write!(f, "could not run kubectl: {}", e),
            Error::Snapshot(e) => write!(f, "snapshot file error: {}", e),
            Error::BadOutput(e) => write!(f, "kubectl output is not utf8: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Runs kubectl and hands back raw stdout. When a snapshot directory is
/// configured, an existing snapshot file is served instead of running the
/// command, and fresh captures are written back for the next offline run.
pub struct Kubectl {
    program: String,
    snapshot_dir: Option<PathBuf>,
}

impl Kubectl {
    pub fn new(program: impl Into<String>, snapshot_dir: Option<PathBuf>) -> Self {
        Kubectl {
            program: program.into(),
            snapshot_dir,
        }
    }

    pub async fn node_description(&self) -> Result<String> {
        self.capture(&["describe", "nodes", "--all-namespaces"], NODE_SNAPSHOT)
            .await
    }

    pub async fn pod_gpu_report(&self) -> Result<String> {
        let args = [
            "get",
            "pods",
            "--all-namespaces",
            "-o",
            "go-template",
            "--template",
            POD_GPU_TEMPLATE,
        ];
        self.capture(&args, POD_SNAPSHOT).await
    }

    async fn capture(&self, args: &[&str], snapshot: &str) -> Result<String> {
        if let Some(dir) = &self.snapshot_dir {
            let path = dir.join(snapshot);
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                let text = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(Error::Snapshot)?;
                info!("loaded snapshot {}", path.display());
                return Ok(text);
            }
        }

        let output = Command::new(&self.program)
            .args(args)
            // keep kubectl's output locale-stable for the scanner
            .env("LC_ALL", "C.UTF8")
            .env("LANGUAGE", "C")
            .output()
            .await
            .map_err(Error::CommandIo)?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: format!("{} {}", self.program, args.join(" ")),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let text = String::from_utf8(output.stdout).map_err(Error::BadOutput)?;

        if let Some(dir) = &self.snapshot_dir {
            tokio::fs::create_dir_all(dir).await.map_err(Error::Snapshot)?;
            let path = dir.join(snapshot);
            tokio::fs::write(&path, &text).await.map_err(Error::Snapshot)?;
            info!("wrote snapshot {}", path.display());
        }

        Ok(text)
    }
}
