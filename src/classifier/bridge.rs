use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::classifier::Classifier;
use crate::core::config::BridgeConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Serialize)]
struct BridgeRequest<'a> {
    model: &'a str,
    texts: &'a [String],
}

/// Runs an external classifier process.
///
/// The process receives `{"model": ..., "texts": [...]}` on stdin and must
/// print a JSON array with one five-element probability array per text.
#[derive(Debug, Clone)]
pub struct ClassifierBridge {
    interpreter: String,
    script_path: PathBuf,
    model: String,
    timeout: Duration,
}

impl ClassifierBridge {
    pub fn new(script_path: PathBuf) -> Self {
        Self::from_config(&BridgeConfig {
            script: script_path,
            ..BridgeConfig::default()
        })
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            interpreter: config.interpreter.clone(),
            script_path: config.script.clone(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn run(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let payload = serde_json::to_vec(&BridgeRequest {
            model: &self.model,
            texts,
        })?;

        tracing::debug!(
            script = %self.script_path.display(),
            texts = texts.len(),
            "invoking classifier bridge"
        );

        let mut child = Command::new(&self.interpreter)
            .arg(&self.script_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| {
                format!(
                    "failed to invoke classifier bridge {} {}",
                    self.interpreter,
                    self.script_path.display()
                )
            })?;

        let mut stdin = child.stdin.take().context("classifier bridge stdin unavailable")?;
        let mut stdout = child.stdout.take().context("classifier bridge stdout unavailable")?;
        let mut stderr = child.stderr.take().context("classifier bridge stderr unavailable")?;

        // stdin is closed when the writer finishes, signalling end of input
        let writer = thread::spawn(move || stdin.write_all(&payload));
        let out_reader = thread::spawn(move || {
            let mut buf = String::new();
            stdout.read_to_string(&mut buf).map(|_| buf)
        });
        let err_reader = thread::spawn(move || {
            let mut buf = String::new();
            stderr.read_to_string(&mut buf).map(|_| buf)
        });

        let status = wait_with_timeout(&mut child, self.timeout)?;

        let stdout = out_reader
            .join()
            .map_err(|_| anyhow::anyhow!("classifier bridge stdout reader panicked"))??;
        let stderr = err_reader
            .join()
            .map_err(|_| anyhow::anyhow!("classifier bridge stderr reader panicked"))?
            .unwrap_or_default();

        if !status.success() {
            anyhow::bail!("classifier bridge failed with status {status}: {}", stderr.trim());
        }

        writer
            .join()
            .map_err(|_| anyhow::anyhow!("classifier bridge stdin writer panicked"))?
            .context("failed to send texts to classifier bridge")?;

        let probabilities: Vec<Vec<f64>> = serde_json::from_str(&stdout)
            .with_context(|| "failed to parse classifier bridge JSON response")?;

        if probabilities.len() != texts.len() {
            anyhow::bail!(
                "classifier bridge returned {} results for {} texts",
                probabilities.len(),
                texts.len()
            );
        }
        Ok(probabilities)
    }
}

impl Classifier for ClassifierBridge {
    fn classify(&self, text: &str) -> Result<Vec<f64>> {
        let mut results = self.run(&[text.to_string()])?;
        results
            .pop()
            .context("classifier bridge returned no result")
    }

    /// One process for the whole batch.
    fn classify_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        self.run(texts)
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<ExitStatus> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if started.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            anyhow::bail!("classifier bridge timed out after {}s", timeout.as_secs_f32());
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn script(name: &str, body: &str) -> Result<PathBuf> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
        let path = std::env::temp_dir().join(format!(
            "docsentiment-bridge-{name}-{}-{now}.sh",
            std::process::id()
        ));
        fs::write(&path, body)?;
        Ok(path)
    }

    fn bridge(path: PathBuf) -> ClassifierBridge {
        ClassifierBridge::new(path)
            .with_interpreter("sh")
            .with_timeout(Duration::from_secs(10))
    }

    #[test]
    fn parses_probabilities_for_each_text() -> Result<()> {
        let path = script(
            "ok",
            "cat > /dev/null\necho '[[0,0,0,0,1],[1,0,0,0,0]]'\n",
        )?;
        let result = bridge(path.clone()).run(&["good".to_string(), "bad".to_string()])?;
        assert_eq!(result, vec![vec![0.0, 0.0, 0.0, 0.0, 1.0], vec![1.0, 0.0, 0.0, 0.0, 0.0]]);
        let _ = fs::remove_file(path);
        Ok(())
    }

    #[test]
    fn surfaces_process_failure() -> Result<()> {
        let path = script("fail", "cat > /dev/null\necho 'model missing' >&2\nexit 3\n")?;
        let err = bridge(path.clone()).run(&["text".to_string()]).unwrap_err();
        assert!(err.to_string().contains("model missing"));
        let _ = fs::remove_file(path);
        Ok(())
    }

    #[test]
    fn rejects_result_count_mismatch() -> Result<()> {
        let path = script("short", "cat > /dev/null\necho '[[0,0,1,0,0]]'\n")?;
        let result = bridge(path.clone()).run(&["a".to_string(), "b".to_string()]);
        assert!(result.is_err());
        let _ = fs::remove_file(path);
        Ok(())
    }

    #[test]
    fn kills_process_after_timeout() -> Result<()> {
        let path = script("slow", "sleep 5\n")?;
        let started = Instant::now();
        let result = bridge(path.clone())
            .with_timeout(Duration::from_millis(200))
            .run(&["a".to_string()]);
        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(4));
        let _ = fs::remove_file(path);
        Ok(())
    }

    #[test]
    fn empty_batch_does_not_spawn() -> Result<()> {
        let bridge = ClassifierBridge::new(PathBuf::from("/nonexistent/classify.py"));
        assert!(bridge.run(&[])?.is_empty());
        Ok(())
    }
}
