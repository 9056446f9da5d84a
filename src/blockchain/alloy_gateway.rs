//! 基于 alloy 的 JSON-RPC 实现
//!
//! 只读调用共享一个无签名 provider；写交易每次用调用者解密后的私钥
//! 构建带钱包的 provider。gas 采用 legacy 定价（`eth_gasPrice`）和固定上限，
//! 新记录的链上 id 在回执之后从对应计数器读取。

use std::fmt::Display;
use std::time::Duration;

use alloy::hex;
use alloy::eips::BlockNumberOrTag;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::{Address, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use tracing::{debug, info};

use super::contract::{ContractManifest, IAssignmentSystem};
use super::gateway::{AssignmentPayload, ChainGateway, ResultPayload, SubmissionPayload};
use super::hashing::to_hex;
use crate::config::BlockchainConfig;
use crate::errors::{EduChainError, Result};
use crate::models::blockchain::entities::{
    AccountBalance, AssignmentReceipt, ChainAccount, ChainAssignment, ChainResult,
    ChainSubmission, NetworkInfo, ReceiptSummary, ResultReceipt, SubmissionReceipt, TxOutcome,
};

fn chain_err<E: Display>(context: &'static str) -> impl FnOnce(E) -> EduChainError {
    move |e| EduChainError::blockchain(format!("{context}: {e}"))
}

fn parse_address(address: &str) -> Result<Address> {
    address
        .parse::<Address>()
        .map_err(|e| EduChainError::validation(format!("地址格式无效: {e}")))
}

fn parse_signer(private_key: &str) -> Result<PrivateKeySigner> {
    private_key
        .parse::<PrivateKeySigner>()
        .map_err(|e| EduChainError::key_vault(format!("私钥格式无效: {e}")))
}

fn eth_to_wei(amount_eth: f64) -> Result<U256> {
    if !amount_eth.is_finite() || amount_eth < 0.0 {
        return Err(EduChainError::validation(format!(
            "转账金额无效: {amount_eth}"
        )));
    }
    parse_ether(&amount_eth.to_string()).map_err(chain_err("换算金额失败"))
}

fn outcome(receipt: &TransactionReceipt) -> Result<TxOutcome> {
    let tx_hash = to_hex(&receipt.transaction_hash);
    if !receipt.status() {
        return Err(EduChainError::blockchain(format!(
            "交易 {tx_hash} 执行失败"
        )));
    }
    Ok(TxOutcome {
        tx_hash,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
    })
}

pub struct AlloyChainGateway {
    url: Url,
    contract: Address,
    reader: DynProvider,
    config: BlockchainConfig,
}

impl AlloyChainGateway {
    pub fn new(config: &BlockchainConfig, manifest: &ContractManifest) -> Result<Self> {
        let url: Url = config
            .node_url
            .parse()
            .map_err(|e| EduChainError::blockchain(format!("节点地址无效: {e}")))?;
        let contract = manifest.address()?;
        let reader = ProviderBuilder::new().connect_http(url.clone()).erased();

        info!(
            "链网关已配置: node={}, contract={}",
            config.node_url, manifest.contract_address
        );

        Ok(Self {
            url,
            contract,
            reader,
            config: config.clone(),
        })
    }

    fn reader_contract(&self) -> IAssignmentSystem::IAssignmentSystemInstance<DynProvider> {
        IAssignmentSystem::new(self.contract, self.reader.clone())
    }

    fn signing_provider(&self, private_key: &str) -> Result<DynProvider> {
        let signer = parse_signer(private_key)?;
        Ok(ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(self.url.clone())
            .erased())
    }

    fn receipt_timeout(&self) -> Option<Duration> {
        Some(Duration::from_secs(self.config.receipt_timeout_secs))
    }

    async fn gas_price(&self) -> Result<u128> {
        self.reader
            .get_gas_price()
            .await
            .map_err(chain_err("获取 gas 价格失败"))
    }

    async fn block_timestamp(&self, block_number: Option<u64>) -> Option<u64> {
        let number = block_number?;
        match self
            .reader
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .await
        {
            Ok(block) => block.map(|b| b.header.timestamp),
            Err(e) => {
                debug!("读取区块 {} 时间戳失败: {}", number, e);
                None
            }
        }
    }

    async fn counter_value(&self, counter: Counter) -> Result<u64> {
        let contract = self.reader_contract();
        let value = match counter {
            Counter::Assignment => contract.assignmentCounter().call().await,
            Counter::Submission => contract.submissionCounter().call().await,
            Counter::Result => contract.resultCounter().call().await,
        }
        .map_err(chain_err("读取计数器失败"))?;
        Ok(value.saturating_to::<u64>())
    }
}

#[derive(Clone, Copy)]
enum Counter {
    Assignment,
    Submission,
    Result,
}

#[async_trait]
impl ChainGateway for AlloyChainGateway {
    fn create_account(&self) -> Result<ChainAccount> {
        let signer = PrivateKeySigner::random();
        Ok(ChainAccount {
            address: signer.address().to_checksum(None),
            private_key: hex::encode_prefixed(signer.to_bytes()),
        })
    }

    async fn balance(&self, address: &str) -> Result<AccountBalance> {
        let addr = parse_address(address)?;
        let wei = self
            .reader
            .get_balance(addr)
            .await
            .map_err(chain_err("查询余额失败"))?;
        Ok(AccountBalance {
            address: addr.to_checksum(None),
            balance_wei: wei.to_string(),
            balance_eth: format_ether(wei),
        })
    }

    async fn fund_account(&self, address: &str, amount_eth: f64) -> Result<TxOutcome> {
        let to = parse_address(address)?;
        let value = eth_to_wei(amount_eth)?;
        let provider = self.signing_provider(&self.config.funding_private_key)?;
        let gas_price = self.gas_price().await?;

        let tx = TransactionRequest::default()
            .with_to(to)
            .with_value(value)
            .with_gas_limit(self.config.gas.transfer)
            .with_gas_price(gas_price)
            .with_chain_id(self.config.chain_id);

        let receipt = provider
            .send_transaction(tx)
            .await
            .map_err(chain_err("发送转账失败"))?
            .with_timeout(Some(Duration::from_secs(self.config.funding_timeout_secs)))
            .get_receipt()
            .await
            .map_err(chain_err("等待转账回执失败"))?;

        let outcome = outcome(&receipt)?;
        info!("已向 {} 转入 {} ETH, tx={}", address, amount_eth, outcome.tx_hash);
        Ok(outcome)
    }

    async fn refund_if_needed(
        &self,
        address: &str,
        min_eth: f64,
        refund_eth: f64,
    ) -> Result<Option<TxOutcome>> {
        let addr = parse_address(address)?;
        let balance = self
            .reader
            .get_balance(addr)
            .await
            .map_err(chain_err("查询余额失败"))?;
        if balance >= eth_to_wei(min_eth)? {
            return Ok(None);
        }
        debug!(
            "{} 余额 {} ETH 低于 {} ETH，补充 {} ETH",
            address,
            format_ether(balance),
            min_eth,
            refund_eth
        );
        self.fund_account(address, refund_eth).await.map(Some)
    }

    async fn create_assignment(
        &self,
        private_key: &str,
        payload: &AssignmentPayload,
    ) -> Result<AssignmentReceipt> {
        let provider = self.signing_provider(private_key)?;
        let contract = IAssignmentSystem::new(self.contract, provider);
        let gas_price = self.gas_price().await?;

        let receipt = contract
            .createAssignment(
                payload.title.clone(),
                payload.description.clone(),
                U256::from(payload.deadline),
                payload.public_key.clone(),
                payload.assignment_hash,
            )
            .gas(self.config.gas.create_assignment)
            .gas_price(gas_price)
            .send()
            .await
            .map_err(chain_err("发送 createAssignment 失败"))?
            .with_timeout(self.receipt_timeout())
            .get_receipt()
            .await
            .map_err(chain_err("等待 createAssignment 回执失败"))?;

        let tx = outcome(&receipt)?;
        let chain_assignment_id = self.counter_value(Counter::Assignment).await?;
        info!("作业已上链: chain_id={}, tx={}", chain_assignment_id, tx.tx_hash);
        Ok(AssignmentReceipt {
            tx,
            chain_assignment_id,
        })
    }

    async fn submit_assignment(
        &self,
        private_key: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt> {
        let provider = self.signing_provider(private_key)?;
        let contract = IAssignmentSystem::new(self.contract, provider);
        let gas_price = self.gas_price().await?;

        let receipt = contract
            .submitAssignment(
                U256::from(payload.chain_assignment_id),
                payload.encrypted_answer.clone(),
                payload.student_info.clone(),
                payload.submission_hash,
            )
            .gas(self.config.gas.submit_assignment)
            .gas_price(gas_price)
            .send()
            .await
            .map_err(chain_err("发送 submitAssignment 失败"))?
            .with_timeout(self.receipt_timeout())
            .get_receipt()
            .await
            .map_err(chain_err("等待 submitAssignment 回执失败"))?;

        let tx = outcome(&receipt)?;
        let chain_submission_id = self.counter_value(Counter::Submission).await?;
        let block_timestamp = self.block_timestamp(tx.block_number).await;
        info!("提交已上链: chain_id={}, tx={}", chain_submission_id, tx.tx_hash);
        Ok(SubmissionReceipt {
            tx,
            chain_submission_id,
            block_timestamp,
        })
    }

    async fn publish_result(
        &self,
        private_key: &str,
        payload: &ResultPayload,
    ) -> Result<ResultReceipt> {
        let provider = self.signing_provider(private_key)?;
        let contract = IAssignmentSystem::new(self.contract, provider);
        let gas_price = self.gas_price().await?;

        let receipt = contract
            .publishResult(
                U256::from(payload.chain_submission_id),
                U256::from(payload.grade),
                payload.comment.clone(),
                payload.result_hash,
            )
            .gas(self.config.gas.publish_result)
            .gas_price(gas_price)
            .send()
            .await
            .map_err(chain_err("发送 publishResult 失败"))?
            .with_timeout(self.receipt_timeout())
            .get_receipt()
            .await
            .map_err(chain_err("等待 publishResult 回执失败"))?;

        let tx = outcome(&receipt)?;
        let chain_result_id = self.counter_value(Counter::Result).await?;
        info!("成绩已上链: chain_id={}, tx={}", chain_result_id, tx.tx_hash);
        Ok(ResultReceipt {
            tx,
            chain_result_id,
        })
    }

    async fn get_assignment(&self, id: u64) -> Result<ChainAssignment> {
        let data = self
            .reader_contract()
            .getAssignment(U256::from(id))
            .call()
            .await
            .map_err(chain_err("读取链上作业失败"))?;
        Ok(ChainAssignment {
            id: data.id.saturating_to(),
            teacher: data.teacher.to_checksum(None),
            title: data.title,
            description: data.description,
            deadline: data.deadline.saturating_to(),
            public_key: data.publicKey,
            assignment_hash: to_hex(&data.assignmentHash),
            is_active: data.isActive,
        })
    }

    async fn assignment_counter(&self) -> Result<u64> {
        self.counter_value(Counter::Assignment).await
    }

    async fn get_assignment_submissions(&self, assignment_id: u64) -> Result<Vec<u64>> {
        let ids = self
            .reader_contract()
            .getAssignmentSubmissions(U256::from(assignment_id))
            .call()
            .await
            .map_err(chain_err("读取作业提交列表失败"))?;
        Ok(ids.into_iter().map(|id| id.saturating_to()).collect())
    }

    async fn get_submission(&self, id: u64) -> Result<ChainSubmission> {
        let data = self
            .reader_contract()
            .getSubmission(U256::from(id))
            .call()
            .await
            .map_err(chain_err("读取链上提交失败"))?;
        Ok(ChainSubmission {
            id: data.id.saturating_to(),
            assignment_id: data.assignmentId.saturating_to(),
            student: data.student.to_checksum(None),
            encrypted_answer: data.encryptedAnswer,
            student_info: data.studentInfo,
            submission_hash: to_hex(&data.submissionHash),
            timestamp: data.timestamp.saturating_to(),
            is_graded: data.isGraded,
        })
    }

    async fn get_student_submissions(&self, address: &str) -> Result<Vec<u64>> {
        let student = parse_address(address)?;
        let ids = self
            .reader_contract()
            .getStudentSubmissions(student)
            .call()
            .await
            .map_err(chain_err("读取学生提交列表失败"))?;
        Ok(ids.into_iter().map(|id| id.saturating_to()).collect())
    }

    async fn get_result(&self, id: u64) -> Result<ChainResult> {
        let data = self
            .reader_contract()
            .getResult(U256::from(id))
            .call()
            .await
            .map_err(chain_err("读取链上成绩失败"))?;
        Ok(ChainResult {
            id: data.id.saturating_to(),
            submission_id: data.submissionId.saturating_to(),
            grade: data.grade.saturating_to(),
            comment: data.comment,
            result_hash: to_hex(&data.resultHash),
            timestamp: data.timestamp.saturating_to(),
        })
    }

    async fn submission_result_id(&self, submission_id: u64) -> Result<u64> {
        let id = self
            .reader_contract()
            .submissionResults(U256::from(submission_id))
            .call()
            .await
            .map_err(chain_err("读取提交成绩失败"))?;
        Ok(id.saturating_to())
    }

    async fn network_info(&self) -> Result<NetworkInfo> {
        let chain_id = self
            .reader
            .get_chain_id()
            .await
            .map_err(chain_err("连接节点失败"))?;
        let block_number = self
            .reader
            .get_block_number()
            .await
            .map_err(chain_err("读取区块高度失败"))?;

        Ok(NetworkInfo {
            connected: true,
            chain_id,
            block_number,
            contract_address: self.contract.to_checksum(None),
            assignment_count: self.counter_value(Counter::Assignment).await?,
            submission_count: self.counter_value(Counter::Submission).await?,
            result_count: self.counter_value(Counter::Result).await?,
        })
    }

    async fn transaction_receipt(&self, tx_hash: &str) -> Result<Option<ReceiptSummary>> {
        let hash = tx_hash
            .parse::<B256>()
            .map_err(|e| EduChainError::validation(format!("交易哈希无效: {e}")))?;
        let receipt = self
            .reader
            .get_transaction_receipt(hash)
            .await
            .map_err(chain_err("读取交易回执失败"))?;

        Ok(receipt.map(|r| ReceiptSummary {
            tx_hash: to_hex(&r.transaction_hash),
            block_number: r.block_number,
            gas_used: r.gas_used,
            status: r.status(),
            from: r.from.to_checksum(None),
            to: r.to.map(|a| a.to_checksum(None)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eth_to_wei() {
        assert_eq!(
            eth_to_wei(1.0).unwrap(),
            U256::from(1_000_000_000_000_000_000u128)
        );
        assert_eq!(
            eth_to_wei(0.5).unwrap(),
            U256::from(500_000_000_000_000_000u128)
        );
        assert!(eth_to_wei(-1.0).is_err());
        assert!(eth_to_wei(f64::NAN).is_err());
    }

    #[test]
    fn test_signer_parse_and_address() {
        // 私钥 0x..01 对应的公开地址
        let signer = parse_signer(
            "0x0000000000000000000000000000000000000000000000000000000000000001",
        )
        .unwrap();
        assert_eq!(
            signer.address().to_checksum(None),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
        assert_eq!(parse_signer("0x12").unwrap_err().code(), "E015");
    }
}
