//! Workspace-level integration tests for AlgoRace live under `tests/`.
