//! UserRole and Permission - Role-scoped access
//!
//! The permission matrix is fixed; there is no per-user override.

text_enum! {
    /// Roles a signed-in user may hold
    pub enum UserRole {
        Admin => "admin",
        /// Trustee of the waqf
        Nazer => "nazer",
        Accountant => "accountant",
        Cashier => "cashier",
        Archivist => "archivist",
        Beneficiary => "beneficiary",
    }
}

text_enum! {
    /// Capabilities checked by the API before touching data
    pub enum Permission {
        ViewAllBeneficiaries => "view_all_beneficiaries",
        ManageBeneficiaries => "manage_beneficiaries",
        ManageProperties => "manage_properties",
        ViewProperties => "view_properties",
        RecordPayments => "record_payments",
        ManageAccounting => "manage_accounting",
        ViewAccounting => "view_accounting",
        ManageTreasury => "manage_treasury",
        ManageDistributions => "manage_distributions",
        ApproveRequests => "approve_requests",
        CompleteDisbursements => "complete_disbursements",
        Govern => "govern",
        ManageArchive => "manage_archive",
        ViewArchive => "view_archive",
        HandleTickets => "handle_tickets",
        MonitorSystem => "monitor_system",
    }
}

impl UserRole {
    pub fn can(&self, permission: Permission) -> bool {
        use Permission::*;
        use UserRole::*;

        match self {
            Admin => true,
            Nazer => matches!(
                permission,
                ViewAllBeneficiaries
                    | ManageBeneficiaries
                    | ManageProperties
                    | ViewProperties
                    | RecordPayments
                    | ViewAccounting
                    | ManageTreasury
                    | ManageDistributions
                    | ApproveRequests
                    | Govern
                    | ManageArchive
                    | ViewArchive
                    | HandleTickets
            ),
            Accountant => matches!(
                permission,
                ViewAllBeneficiaries
                    | ViewProperties
                    | RecordPayments
                    | ManageAccounting
                    | ViewAccounting
                    | ManageTreasury
                    | CompleteDisbursements
                    | ViewArchive
            ),
            Cashier => matches!(
                permission,
                ViewAllBeneficiaries | ViewProperties | RecordPayments | CompleteDisbursements
            ),
            Archivist => matches!(permission, ViewProperties | ManageArchive | ViewArchive),
            Beneficiary => false,
        }
    }

    /// All permissions granted to this role, in declaration order
    pub fn permissions(&self) -> Vec<Permission> {
        Permission::ALL
            .iter()
            .copied()
            .filter(|p| self.can(*p))
            .collect()
    }
}
