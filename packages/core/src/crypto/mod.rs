//! Криптографический модуль
//!
//! # Архитектура
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! └─────────────────────────────────────────────────────────────┘
//!                │                              │
//!                ▼                              ▼
//! ┌───────────────────────────┐  ┌──────────────────────────────┐
//! │   HybridComposer          │  │  Threshold coordinator        │
//! │  - hybrid KEM / signature │  │  - TrustedDealer              │
//! │  - HKDF combination       │  │  - SigningSession (T-of-N)    │
//! │  - sealed envelopes       │  │  - Ed25519-compatible output  │
//! └───────────────────────────┘  └──────────────────────────────┘
//!                │                              │
//!                └──────────────┬───────────────┘
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              AlgorithmRegistry (Crypto-Agility)             │
//! │  - AlgorithmId → Adapter                                    │
//! │  - Builder → frozen registry, process-wide install          │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Adapter + providers (suites)                │
//! │  - KEM: X25519, ML-KEM, FrodoKEM, NTRU                      │
//! │  - Signatures: Ed25519, ML-DSA, Falcon, SPHINCS+            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Модули
//!
//! ### Core Traits
//! - [`provider`]: `KemPrimitive` / `SignaturePrimitive` для crypto-agility
//! - [`adapter`]: единый интерфейс над одним примитивом
//!
//! ### Implementations
//! - [`suites`]: провайдеры (Classic, Post-Quantum)
//! - [`registry`]: реестр алгоритмов
//!
//! ### Composition
//! - [`hybrid`]: гибридный KEM, гибридные подписи, конверты
//! - [`threshold`]: пороговые подписи Ed25519

pub mod adapter;
pub mod algorithm;
pub mod hybrid;
pub mod keys;
pub mod provider;
pub mod registry;
pub mod suites;
pub mod threshold;

pub use adapter::{Adapter, AdapterFactory};
pub use algorithm::{AlgorithmId, AlgorithmKind, Capability};
pub use registry::{AlgorithmRegistry, RegistryBuilder};
