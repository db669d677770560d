// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

pub(crate) mod audit;
pub(crate) mod catalog;
pub(crate) mod orders;
pub(crate) mod repair;
pub(crate) mod users;

pub use orders::PersistedOrder;
pub use repair::RepairReport;
