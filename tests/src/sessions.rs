//! Session lifecycle scenarios driving the pipeline end to end.

use std::sync::Arc;
use std::time::Duration;

use enumgen_parser::registry::LanguageRegistry;
use enumgen_session::{SessionError, SessionManager, SessionSnapshot};

use crate::utils::COLOR_SOURCE;

fn manager() -> SessionManager {
    SessionManager::new(LanguageRegistry::new())
}

#[test]
fn edit_recompile_generate_through_a_session() {
    let manager = manager();
    let session = manager.create("colors", "csharp").unwrap();

    {
        let mut session = session.lock();
        session.update_source("colors.cs", COLOR_SOURCE).unwrap();
        let compilation = session.compilation().unwrap();
        let units = enumgen::generate(&compilation);
        assert_eq!(units.len(), 1);

        // Adding an option shows up after the rebuild.
        session
            .update_source(
                "purple.cs",
                "namespace Paint { public class Purple : Color { } }",
            )
            .unwrap();
        let compilation = session.compilation().unwrap();
        let units = enumgen::generate(&compilation);
        assert!(units[0].text.contains("new Paint.Purple(),"));
    }

    assert!(manager.destroy("colors"));
}

#[test]
fn snapshot_survives_a_destroy_and_restore_cycle() {
    let manager = manager();
    let session = manager.create("a", "csharp").unwrap();
    let snapshot: SessionSnapshot = {
        let mut session = session.lock();
        session.update_source("colors.cs", COLOR_SOURCE).unwrap();
        session.snapshot().unwrap()
    };
    let encoded = serde_json::to_string(&snapshot).unwrap();
    manager.destroy("a");

    let restored = manager.create("a", "csharp").unwrap();
    let mut restored = restored.lock();
    restored
        .restore(serde_json::from_str(&encoded).unwrap())
        .unwrap();
    let compilation = restored.compilation().unwrap();
    assert_eq!(enumgen::generate(&compilation).len(), 1);
}

#[test]
fn sweeper_thread_destroys_idle_sessions() {
    let manager = Arc::new(SessionManager::with_idle_timeout(
        LanguageRegistry::new(),
        Duration::from_millis(10),
    ));
    manager.create("idle", "csharp").unwrap();
    enumgen_session::manager::spawn_sweeper(&manager, Duration::from_millis(20));

    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while !manager.is_empty() && std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(manager.is_empty(), "idle session should have been swept");
    assert!(manager.get("idle").is_none());
}

#[test]
fn typed_failures_never_panic_across_the_boundary() {
    let manager = manager();
    assert!(matches!(
        manager.create("x", "fortran"),
        Err(SessionError::UnknownLanguage { .. })
    ));

    let session = manager.create("x", "csharp").unwrap();
    manager.destroy("x");
    let result = session.lock().update_source("a.cs", "text");
    assert!(matches!(result, Err(SessionError::Disposed { .. })));
}
