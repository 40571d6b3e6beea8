//! # 迁移流水线
//!
//! 读取旧库 → 内存映射 → 单事务写入新库 → 报告。各阶段按顺序 await。
//! 新库连接在确认旧库有数据之后才建立。

use std::future::Future;
use std::time::Instant;
use uuid::Uuid;

use crate::config::MigrationOptions;
use crate::error::Result;
use crate::logging::{LogComponent, LogStage};
use crate::report::{MigrationOutcome, MigrationReport, TARGET_TIMEZONE};
use crate::repository::RecordRepository;
use crate::transform::RecordMapper;
use crate::types::LegacyUserRecord;
use crate::{ldebug, lerror, linfo, lwarn};

/// 迁移流水线
#[derive(Debug, Clone)]
pub struct MigrationPipeline {
    options: MigrationOptions,
    run_id: Uuid,
}

impl MigrationPipeline {
    /// 以新的运行 ID 创建流水线
    #[must_use]
    pub fn new(options: MigrationOptions) -> Self {
        Self {
            options,
            run_id: Uuid::new_v4(),
        }
    }

    /// 本次运行的 ID，贯穿所有日志
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// 运行选项
    #[must_use]
    pub const fn options(&self) -> &MigrationOptions {
        &self.options
    }

    /// 使用已就绪的新库仓储执行一次迁移
    ///
    /// 旧库为空时直接返回 [`MigrationOutcome::NoSourceRecords`]，不触碰新库。
    /// 写入失败时新库整体回滚，不会留下部分数据。
    pub async fn run(
        &self,
        source: &dyn RecordRepository,
        destination: &dyn RecordRepository,
    ) -> Result<MigrationOutcome> {
        let started = Instant::now();
        let Some(legacy) = self.fetch(source).await? else {
            return Ok(MigrationOutcome::NoSourceRecords {
                run_id: self.run_id,
            });
        };
        self.transfer(&legacy, destination, started).await
    }

    /// 读取旧库后再建立新库连接并执行迁移
    ///
    /// 旧库为空时 `connect_destination` 不会被调用。
    /// 由此建立的新库连接在写入结束后关闭。
    pub async fn run_with_destination<D, F, Fut>(
        &self,
        source: &dyn RecordRepository,
        connect_destination: F,
    ) -> Result<MigrationOutcome>
    where
        D: RecordRepository,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<D>>,
    {
        let started = Instant::now();
        let run_id = self.run_id;
        let Some(legacy) = self.fetch(source).await? else {
            return Ok(MigrationOutcome::NoSourceRecords { run_id });
        };

        let destination = connect_destination().await.inspect_err(|e| {
            lerror!(
                run_id,
                LogStage::Connect,
                LogComponent::Database,
                "connect_destination",
                "无法连接新库",
                error = e.chain_message()
            );
        })?;
        linfo!(
            run_id,
            LogStage::Connect,
            LogComponent::Database,
            "connect_destination",
            "新库已连接"
        );

        let outcome = self.transfer(&legacy, &destination, started).await;
        if let Err(e) = destination.close().await {
            lwarn!(
                run_id,
                LogStage::Shutdown,
                LogComponent::Database,
                "close",
                "关闭新库连接失败",
                error = e.chain_message()
            );
        }
        outcome
    }

    /// 校验选项并读取旧库；旧库为空时返回 `None`
    async fn fetch(&self, source: &dyn RecordRepository) -> Result<Option<Vec<LegacyUserRecord>>> {
        let run_id = self.run_id;
        self.options.validate()?;

        linfo!(
            run_id,
            LogStage::Startup,
            LogComponent::Pipeline,
            "run",
            "开始迁移",
            source_timezone = self.options.source_timezone.name(),
            transfer_expire = self.options.transfer_expire,
            batch_size = self.options.batch_size
        );

        let legacy = source
            .fetch_all_users_with_proxy_settings()
            .await
            .inspect_err(|e| {
                lerror!(
                    run_id,
                    LogStage::Fetch,
                    LogComponent::Pipeline,
                    "fetch",
                    "读取旧库失败",
                    error = e.chain_message()
                );
            })?;

        if legacy.is_empty() {
            linfo!(
                run_id,
                LogStage::Fetch,
                LogComponent::Pipeline,
                "fetch",
                "旧库中没有用户"
            );
            return Ok(None);
        }
        linfo!(
            run_id,
            LogStage::Fetch,
            LogComponent::Pipeline,
            "fetch",
            "读取旧库完成",
            count = legacy.len()
        );
        Ok(Some(legacy))
    }

    /// 映射并写入新库
    async fn transfer(
        &self,
        legacy: &[LegacyUserRecord],
        destination: &dyn RecordRepository,
        started: Instant,
    ) -> Result<MigrationOutcome> {
        let run_id = self.run_id;
        let mapper = RecordMapper::new(&self.options);
        let migrated = mapper.map_all(legacy);
        let missing_proxy = legacy
            .iter()
            .filter(|record| record.legacy_proxy_settings.is_none())
            .count();
        ldebug!(
            run_id,
            LogStage::Transform,
            LogComponent::Mapper,
            "map_all",
            "记录映射完成",
            count = migrated.len(),
            without_vless = missing_proxy,
            created_at_default = mapper.created_at_default()
        );

        let inserted = destination.bulk_insert(&migrated).await.inspect_err(|e| {
            lerror!(
                run_id,
                LogStage::Insert,
                LogComponent::Pipeline,
                "bulk_insert",
                "写入新库失败，已回滚",
                error = e.chain_message()
            );
        })?;

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        linfo!(
            run_id,
            LogStage::Report,
            LogComponent::Pipeline,
            "run",
            "迁移完成",
            migrated = inserted,
            elapsed_ms = elapsed_ms
        );

        Ok(MigrationOutcome::Migrated(MigrationReport {
            run_id,
            migrated: inserted,
            source_timezone: self.options.source_timezone,
            target_timezone: TARGET_TIMEZONE.to_string(),
            expire_transferred: self.options.transfer_expire,
            started_at: self.options.run_started_at,
            elapsed_ms,
        }))
    }
}

/// 使用新的运行 ID 执行一次迁移
pub async fn run(
    source: &dyn RecordRepository,
    destination: &dyn RecordRepository,
    options: &MigrationOptions,
) -> Result<MigrationOutcome> {
    MigrationPipeline::new(*options).run(source, destination).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MigrateError;
    use crate::testing::fixtures::LegacyUserFixture;
    use crate::testing::mocks::{InMemoryRepository, MockRepository};
    use crate::types::{DEFAULT_VLESS_FLOW, SHADOWSOCKS_METHOD, SourceTimezone};
    use pretty_assertions::assert_eq;

    fn options() -> MigrationOptions {
        MigrationOptions::new(true, SourceTimezone::Utc)
    }

    #[tokio::test]
    async fn test_empty_source_never_inserts() {
        let mut source = MockRepository::new();
        source
            .expect_fetch_all_users_with_proxy_settings()
            .times(1)
            .returning(|| Ok(Vec::new()));
        let mut destination = MockRepository::new();
        destination.expect_bulk_insert().never();

        let pipeline = MigrationPipeline::new(options());
        let outcome = pipeline.run(&source, &destination).await.unwrap();

        assert_eq!(
            outcome,
            MigrationOutcome::NoSourceRecords {
                run_id: pipeline.run_id()
            }
        );
    }

    #[tokio::test]
    async fn test_source_failure_skips_destination() {
        let mut source = MockRepository::new();
        source
            .expect_fetch_all_users_with_proxy_settings()
            .returning(|| Err(MigrateError::source_query("Table 'proxies' doesn't exist")));
        let mut destination = MockRepository::new();
        destination.expect_bulk_insert().never();

        let err = run(&source, &destination, &options()).await.unwrap_err();
        assert_eq!(err.kind(), "SOURCE_QUERY_ERROR");
    }

    #[tokio::test]
    async fn test_invalid_batch_size_is_config_error() {
        let source = MockRepository::new();
        let destination = MockRepository::new();

        let err = run(&source, &destination, &options().with_batch_size(0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "CONFIG_ERROR");
    }

    #[tokio::test]
    async fn test_inserts_every_mapped_record_once() {
        let mut source = MockRepository::new();
        source
            .expect_fetch_all_users_with_proxy_settings()
            .returning(|| {
                Ok(vec![
                    LegacyUserFixture::new().username("a").build(),
                    LegacyUserFixture::new().username("b").build(),
                ])
            });
        let mut destination = MockRepository::new();
        destination
            .expect_bulk_insert()
            .times(1)
            .withf(|records| records.len() == 2 && records[0].username == "a")
            .returning(|records| Ok(records.len() as u64));

        let outcome = run(&source, &destination, &options()).await.unwrap();
        assert_eq!(outcome.migrated(), 2);
    }

    #[tokio::test]
    async fn test_end_to_end_in_memory() {
        let source = InMemoryRepository::with_source(vec![
            LegacyUserFixture::new()
                .username("valid")
                .expire(crate::types::RawTimestamp::from("2025-01-01 00:00:00"))
                .vless_settings(r#"{"id": "11111111-2222-4333-8444-555555555555", "flow": ""}"#)
                .build(),
            LegacyUserFixture::new()
                .username("malformed")
                .vless_settings("not json at all")
                .build(),
            LegacyUserFixture::new().username("no_proxy").build(),
        ]);
        let destination = InMemoryRepository::new();

        let outcome = run(&source, &destination, &options()).await.unwrap();
        let MigrationOutcome::Migrated(report) = outcome else {
            panic!("expected migrated outcome");
        };
        assert_eq!(report.migrated, 3);
        assert!(report.expire_transferred);
        assert_eq!(report.target_timezone, "UTC");

        let rows = destination.inserted();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].proxy_settings.vless.id, "11111111-2222-4333-8444-555555555555");
        assert_eq!(rows[0].proxy_settings.vless.flow, "");
        assert_eq!(rows[0].expire.as_deref(), Some("2025-01-01 00:00:00"));
        for row in &rows[1..] {
            assert_eq!(row.proxy_settings.vless.flow, DEFAULT_VLESS_FLOW);
            assert_eq!(row.proxy_settings.shadowsocks.method, SHADOWSOCKS_METHOD);
            assert!(!row.proxy_settings.trojan.password.is_empty());
        }
    }

    #[tokio::test]
    async fn test_destination_failure_is_all_or_nothing() {
        let source = InMemoryRepository::with_source(vec![
            LegacyUserFixture::new().username("first").build(),
            LegacyUserFixture::new().username("dup").build(),
            LegacyUserFixture::new().username("last").build(),
        ]);
        let destination = InMemoryRepository::new().failing_on("dup");

        let err = run(&source, &destination, &options()).await.unwrap_err();
        assert!(matches!(err, MigrateError::DestinationWrite { .. }));
        assert_eq!(destination.insert_calls(), 1);
        assert!(destination.inserted().is_empty());
    }

    #[tokio::test]
    async fn test_empty_source_never_connects_destination() {
        let source = InMemoryRepository::new();
        let pipeline = MigrationPipeline::new(options());

        let outcome = pipeline
            .run_with_destination(&source, || async {
                Err::<InMemoryRepository, _>(MigrateError::connection("新库不可达"))
            })
            .await
            .unwrap();

        assert_eq!(outcome.migrated(), 0);
        assert!(matches!(outcome, MigrationOutcome::NoSourceRecords { .. }));
    }

    #[tokio::test]
    async fn test_destination_connect_failure_after_fetch() {
        let source =
            InMemoryRepository::with_source(vec![LegacyUserFixture::new().username("a").build()]);
        let pipeline = MigrationPipeline::new(options());

        let err = pipeline
            .run_with_destination(&source, || async {
                Err::<InMemoryRepository, _>(MigrateError::connection("新库不可达"))
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "CONNECTION_ERROR");
    }

    #[tokio::test]
    async fn test_connected_destination_is_written_and_closed() {
        let mut source = MockRepository::new();
        source
            .expect_fetch_all_users_with_proxy_settings()
            .returning(|| Ok(vec![LegacyUserFixture::new().username("only").build()]));

        let outcome = MigrationPipeline::new(options())
            .run_with_destination(&source, || async {
                let mut destination = MockRepository::new();
                destination
                    .expect_bulk_insert()
                    .times(1)
                    .returning(|records| Ok(records.len() as u64));
                destination.expect_close().times(1).returning(|| Ok(()));
                Ok::<_, MigrateError>(destination)
            })
            .await
            .unwrap();

        assert_eq!(outcome.migrated(), 1);
    }
}
