mod smoke_tests;
mod storage_mock;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: Basic functionality tests to ensure nothing is broken
// - notifier_mock: Recording notifier for exercising the reminder sweep
// - storage_mock: Store behavior against a real on-disk JSON store
